//! Card insights: progress, priority, due state, filtering and sorting

use crate::types::{sort_siblings, Card, OrderedItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Days of inactivity after which a card no longer counts as recently active
pub const RECENT_ACTIVITY_DAYS: i64 = 7;

/// Checklist completion of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistProgress {
    pub total: u32,
    pub completed: u32,
    /// Rounded to the nearest whole percent
    pub percentage: u32,
}

/// Priority derived from label colours. Declared in sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    None,
}

impl Priority {
    fn from_color(color: &str) -> Option<Self> {
        match color {
            "red" | "orange" => Some(Self::High),
            "yellow" | "blue" => Some(Self::Medium),
            "green" | "purple" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Overall state of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardState {
    Completed,
    InProgress,
    Pending,
    Overdue,
}

/// Everything the board view shows about a card's progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardStatus {
    pub state: CardState,
    pub progress: u32,
    pub priority: Priority,
    pub days_until_due: Option<i64>,
    pub is_overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub last_activity: DateTime<Utc>,
    pub days_since_activity: i64,
    pub has_recent_activity: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberStats {
    pub total_members: usize,
    pub member_names: Vec<String>,
    pub has_assigned_members: bool,
}

pub fn checklist_progress(card: &Card) -> ChecklistProgress {
    let Some(badges) = card.badges.as_ref() else {
        return ChecklistProgress {
            total: 0,
            completed: 0,
            percentage: 0,
        };
    };

    let total = badges.check_items;
    let completed = badges.check_items_checked;
    let percentage = if total > 0 {
        (f64::from(completed) / f64::from(total) * 100.0).round() as u32
    } else {
        0
    };

    ChecklistProgress {
        total,
        completed,
        percentage,
    }
}

/// Highest priority among the card's label colours
pub fn card_priority(card: &Card) -> Priority {
    card.labels
        .iter()
        .filter_map(|label| label.color.as_deref().and_then(Priority::from_color))
        .min()
        .unwrap_or(Priority::None)
}

/// Past due and not marked complete
pub fn is_overdue_at(card: &Card, now: DateTime<Utc>) -> bool {
    match card.due {
        Some(due) if !card.due_complete => due < now,
        _ => false,
    }
}

/// Whole days until the due date, rounded up; negative once overdue
pub fn days_until_due_at(card: &Card, now: DateTime<Utc>) -> Option<i64> {
    let due = card.due?;
    let millis = (due - now).num_milliseconds() as f64;
    Some((millis / MILLIS_PER_DAY).ceil() as i64)
}

/// Overdue wins over completed, completed over in-progress
pub fn card_status_at(card: &Card, now: DateTime<Utc>) -> CardStatus {
    let progress = checklist_progress(card);
    let is_overdue = is_overdue_at(card, now);

    let state = if is_overdue {
        CardState::Overdue
    } else if progress.percentage == 100 || card.due_complete {
        CardState::Completed
    } else if progress.percentage > 0 {
        CardState::InProgress
    } else {
        CardState::Pending
    };

    CardStatus {
        state,
        progress: progress.percentage,
        priority: card_priority(card),
        days_until_due: days_until_due_at(card, now),
        is_overdue,
    }
}

pub fn card_status(card: &Card) -> CardStatus {
    card_status_at(card, Utc::now())
}

pub fn activity_summary_at(card: &Card, now: DateTime<Utc>) -> ActivitySummary {
    let days_since_activity = (now - card.date_last_activity).num_days();
    ActivitySummary {
        last_activity: card.date_last_activity,
        days_since_activity,
        has_recent_activity: days_since_activity <= RECENT_ACTIVITY_DAYS,
    }
}

pub fn member_stats(card: &Card) -> MemberStats {
    let member_names: Vec<String> = card
        .members
        .iter()
        .map(|member| member.display_name().to_string())
        .collect();

    MemberStats {
        total_members: member_names.len(),
        has_assigned_members: !member_names.is_empty(),
        member_names,
    }
}

/// Criteria for [`filter_cards_at`]; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardFilter {
    pub priority: Option<Priority>,
    pub state: Option<CardState>,
    pub has_members: Option<bool>,
    pub has_due_date: Option<bool>,
    pub is_overdue: Option<bool>,
    /// Matches cards carrying at least one of these colours
    pub label_colors: Vec<String>,
    pub member_id: Option<String>,
}

impl CardFilter {
    pub fn matches_at(&self, card: &Card, now: DateTime<Utc>) -> bool {
        let status = card_status_at(card, now);

        if self.priority.is_some_and(|p| p != status.priority) {
            return false;
        }
        if self.state.is_some_and(|s| s != status.state) {
            return false;
        }
        if self
            .has_members
            .is_some_and(|wanted| wanted != !card.members.is_empty())
        {
            return false;
        }
        if self
            .has_due_date
            .is_some_and(|wanted| wanted != card.due.is_some())
        {
            return false;
        }
        if self.is_overdue.is_some_and(|wanted| wanted != status.is_overdue) {
            return false;
        }
        if !self.label_colors.is_empty() {
            let has_color = card.labels.iter().any(|label| {
                label
                    .color
                    .as_ref()
                    .is_some_and(|color| self.label_colors.contains(color))
            });
            if !has_color {
                return false;
            }
        }
        if let Some(member_id) = &self.member_id {
            if !card.id_members.contains(member_id) {
                return false;
            }
        }
        true
    }
}

pub fn filter_cards_at<'a>(
    cards: &'a [Card],
    filter: &CardFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Card> {
    cards
        .iter()
        .filter(|card| filter.matches_at(card, now))
        .collect()
}

pub fn filter_cards<'a>(cards: &'a [Card], filter: &CardFilter) -> Vec<&'a Card> {
    filter_cards_at(cards, filter, Utc::now())
}

/// Sort keys offered by the board view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// High first
    Priority,
    /// Soonest first, cards without a due date last
    DueDate,
    /// Most complete first
    Progress,
    /// Most recently active first
    Activity,
    /// Board order
    Position,
}

/// Sorted copy of `cards`; stable for equal keys
pub fn sort_cards(cards: &[Card], key: SortKey) -> Vec<Card> {
    let mut sorted = cards.to_vec();

    match key {
        SortKey::Priority => sorted.sort_by_key(card_priority),
        SortKey::DueDate => sorted.sort_by(|a, b| match (a.due, b.due) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::Progress => {
            sorted.sort_by_key(|card| std::cmp::Reverse(checklist_progress(card).percentage))
        }
        SortKey::Activity => {
            sorted.sort_by_key(|card| std::cmp::Reverse(card.date_last_activity))
        }
        SortKey::Position => {
            sorted.sort_by(|a, b| OrderedItem::from(a).sibling_cmp(&OrderedItem::from(b)))
        }
    }

    sorted
}

/// Board order of `cards` as reorderable items
pub fn ordered_items(cards: &[Card]) -> Vec<OrderedItem> {
    let mut items: Vec<OrderedItem> = cards.iter().map(OrderedItem::from).collect();
    sort_siblings(&mut items);
    items
}
