//! Fractional position engine
//!
//! Positions are real-valued keys. Relocating one item computes a single new
//! key between its new neighbours, so unaffected siblings keep their keys:
//!
//! - empty container: `baseline`
//! - head: half of the first key
//! - tail: last key plus `gap`
//! - between two items: the midpoint
//!
//! Repeated bisection eventually runs out of room. When the span to split is
//! no wider than `min_gap`, or the midpoint is not strictly inside it, the
//! remaining siblings are renumbered to `gap, 2*gap, ...` and the key is
//! computed against that set instead. Renumbering never surfaces as an error.

use crate::error::{BoardError, Result};
use crate::types::{sort_siblings, ItemId, OrderedItem, PositionUpdate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use treew_config::ReorderSettings;

pub use treew_config::defaults::{DEFAULT_BASELINE, DEFAULT_GAP, DEFAULT_MIN_GAP};

/// Key spacing used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacing {
    /// Key given to the first item of an empty container
    pub baseline: f64,
    /// Tail increment and renumbering step
    pub gap: f64,
    /// Narrowest span that may still be bisected
    pub min_gap: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE,
            gap: DEFAULT_GAP,
            min_gap: DEFAULT_MIN_GAP,
        }
    }
}

impl Spacing {
    /// Reject spacing that could produce colliding or non-positive keys
    pub fn validate(&self) -> Result<()> {
        ReorderSettings {
            baseline: self.baseline,
            gap: self.gap,
            min_gap: self.min_gap,
            ..ReorderSettings::default()
        }
        .validate()?;
        Ok(())
    }
}

impl From<&ReorderSettings> for Spacing {
    fn from(settings: &ReorderSettings) -> Self {
        Self {
            baseline: settings.baseline,
            gap: settings.gap,
            min_gap: settings.min_gap,
        }
    }
}

/// Result of relocating one item inside a sibling sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedReorder {
    /// All siblings in their new display order
    pub siblings: Vec<OrderedItem>,
    /// The relocated item
    pub moved_id: ItemId,
    /// Key now carried by the relocated item
    pub new_position: f64,
    /// Display index before the move (`None` for an insertion)
    pub from_index: Option<usize>,
    /// Display index after the move
    pub to_index: usize,
    /// Writes the remote store must accept for this reorder to stick
    pub updates: Vec<PositionUpdate>,
    /// Whether the siblings had to be renumbered
    pub renumbered: bool,
}

impl AppliedReorder {
    /// True when nothing needs persisting
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
    }
}

enum Placement {
    Fits(f64),
    Renumbered {
        others: Vec<OrderedItem>,
        position: f64,
    },
}

/// Computes fractional keys. Holds no sibling state between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionEngine {
    spacing: Spacing,
}

impl PositionEngine {
    /// Engine with the default spacing
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom spacing
    pub fn with_spacing(spacing: Spacing) -> Result<Self> {
        spacing.validate()?;
        Ok(Self { spacing })
    }

    /// Engine configured from settings
    pub fn from_settings(settings: &ReorderSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            spacing: Spacing::from(settings),
        })
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Compute the key `moving_id` gets when placed at `target_index`.
    ///
    /// `target_index` counts among the siblings left once the moving item is
    /// taken out, and is clamped to `[0, remaining]`. The moving item may be
    /// absent, in which case it is treated as new. If the siblings had to be
    /// renumbered the key is relative to the renumbered set; use
    /// [`PositionEngine::apply_reorder`] to obtain that set.
    pub fn compute_fractional_position(
        &self,
        siblings: &[OrderedItem],
        moving_id: &ItemId,
        target_index: usize,
    ) -> Result<f64> {
        let (others, removed) = self.prepare(siblings, moving_id)?;
        let target = target_index.min(others.len());

        if let Some((from, ref item)) = removed {
            if from == target {
                return Ok(item.position);
            }
        }

        Ok(match self.place(&others, target) {
            Placement::Fits(position) => position,
            Placement::Renumbered { position, .. } => position,
        })
    }

    /// Relocate an existing sibling and stamp it with its new key.
    ///
    /// Moving an item onto its current index returns the siblings unchanged
    /// with no updates.
    pub fn apply_reorder(
        &self,
        siblings: &[OrderedItem],
        moving_id: &ItemId,
        target_index: usize,
    ) -> Result<AppliedReorder> {
        let (others, removed) = self.prepare(siblings, moving_id)?;
        let (from, moving) =
            removed.ok_or_else(|| BoardError::item_not_found(moving_id.as_str()))?;
        let target = target_index.min(others.len());

        if from == target {
            let mut unchanged = others;
            let new_position = moving.position;
            unchanged.insert(from, moving);
            return Ok(AppliedReorder {
                siblings: unchanged,
                moved_id: moving_id.clone(),
                new_position,
                from_index: Some(from),
                to_index: target,
                updates: Vec::new(),
                renumbered: false,
            });
        }

        Ok(self.relocate(siblings, others, moving_id, Some(from), target))
    }

    /// Place an item that is not yet part of the siblings
    pub fn apply_insert(
        &self,
        siblings: &[OrderedItem],
        new_id: &ItemId,
        target_index: usize,
    ) -> Result<AppliedReorder> {
        let (others, removed) = self.prepare(siblings, new_id)?;
        if removed.is_some() {
            return Err(BoardError::duplicate_id(new_id.as_str()));
        }
        let target = target_index.min(others.len());

        Ok(self.relocate(siblings, others, new_id, None, target))
    }

    /// Key for a new item appended after every sibling
    pub fn next_position(&self, siblings: &[OrderedItem]) -> Result<f64> {
        self.compute_fractional_position(siblings, &ItemId::new(), usize::MAX)
    }

    /// Reassign evenly spaced keys (`gap, 2*gap, ...`) in the given order
    pub fn renumber(&self, ordered: &[OrderedItem]) -> Vec<OrderedItem> {
        ordered
            .iter()
            .enumerate()
            .map(|(index, item)| OrderedItem::new(item.id.clone(), self.renumbered_key(index)))
            .collect()
    }

    fn relocate(
        &self,
        original: &[OrderedItem],
        others: Vec<OrderedItem>,
        moving_id: &ItemId,
        from_index: Option<usize>,
        target: usize,
    ) -> AppliedReorder {
        let (mut siblings, new_position, renumbered) = match self.place(&others, target) {
            Placement::Fits(position) => (others, position, false),
            Placement::Renumbered { others, position } => (others, position, true),
        };
        siblings.insert(target, OrderedItem::new(moving_id.clone(), new_position));

        let updates = if renumbered {
            let before: HashMap<&ItemId, f64> =
                original.iter().map(|item| (&item.id, item.position)).collect();
            siblings
                .iter()
                .filter(|item| before.get(&item.id) != Some(&item.position))
                .map(PositionUpdate::from)
                .collect()
        } else {
            vec![PositionUpdate {
                id: moving_id.clone(),
                position: new_position,
            }]
        };

        debug!(
            item = %moving_id,
            from = ?from_index,
            to = target,
            position = new_position,
            renumbered,
            "Computed new position"
        );

        AppliedReorder {
            siblings,
            moved_id: moving_id.clone(),
            new_position,
            from_index,
            to_index: target,
            updates,
            renumbered,
        }
    }

    /// Validate, sort, and take the moving item out
    fn prepare(
        &self,
        siblings: &[OrderedItem],
        moving_id: &ItemId,
    ) -> Result<(Vec<OrderedItem>, Option<(usize, OrderedItem)>)> {
        validate_siblings(siblings)?;

        let mut ordered = siblings.to_vec();
        sort_siblings(&mut ordered);

        let removed = ordered
            .iter()
            .position(|item| &item.id == moving_id)
            .map(|from| (from, ordered.remove(from)));

        Ok((ordered, removed))
    }

    fn place(&self, others: &[OrderedItem], target: usize) -> Placement {
        if !self.is_degenerate(others) {
            if let Some(position) = self.bisect(others, target) {
                return Placement::Fits(position);
            }
        }

        debug!(
            siblings = others.len(),
            target, "Fractional keys exhausted, renumbering siblings"
        );
        let renumbered = self.renumber(others);
        let position = if target >= renumbered.len() {
            self.renumbered_key(renumbered.len())
        } else {
            self.spacing.gap * (target as f64 + 0.5)
        };

        Placement::Renumbered {
            others: renumbered,
            position,
        }
    }

    /// Key strictly inside the slot at `target`, if one can be made
    fn bisect(&self, others: &[OrderedItem], target: usize) -> Option<f64> {
        let Some(last) = others.last() else {
            return Some(self.spacing.baseline);
        };

        let (lower, upper) = match target {
            0 => (0.0, Some(others[0].position)),
            t if t >= others.len() => (last.position, None),
            t => (others[t - 1].position, Some(others[t].position)),
        };

        let candidate = match upper {
            Some(upper) if upper - lower <= self.spacing.min_gap => return None,
            Some(upper) => lower + (upper - lower) / 2.0,
            None => lower + self.spacing.gap,
        };

        let inside = candidate > lower && upper.map_or(true, |upper| candidate < upper);
        (candidate.is_finite() && candidate > 0.0 && inside).then_some(candidate)
    }

    /// Existing ties or non-positive keys are repaired rather than extended
    fn is_degenerate(&self, others: &[OrderedItem]) -> bool {
        others.first().is_some_and(|first| first.position <= 0.0)
            || others
                .windows(2)
                .any(|pair| pair[1].position <= pair[0].position)
    }

    fn renumbered_key(&self, index: usize) -> f64 {
        self.spacing.gap * (index as f64 + 1.0)
    }
}

/// Reject sibling sets with duplicate identifiers or unorderable keys
pub fn validate_siblings(siblings: &[OrderedItem]) -> Result<()> {
    let mut seen = HashSet::with_capacity(siblings.len());
    for item in siblings {
        if !item.position.is_finite() {
            return Err(BoardError::InvalidPosition {
                id: item.id.to_string(),
                position: item.position,
            });
        }
        if !seen.insert(&item.id) {
            return Err(BoardError::duplicate_id(item.id.as_str()));
        }
    }
    Ok(())
}
