//! Interaction dataset and grouping.
//!
//! An [`Interactions`] value is the deduplicated set of `(user, item)`
//! records every job starts from. Grouping along an [`Axis`] is the
//! "shuffle" step: all members sharing a key end up in one group, which is
//! then processed locally.

use std::fmt;

use crate::config::GroupCapPolicy;
use crate::dataflow;
use crate::error::{LlrError, Result};
use crate::observe::{PipelineEvent, Reporter, Stage};

/// Identifier of a user or an item.
pub type EntityId = i64;

/// One observed `(user, item)` interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interaction {
    /// Acting user
    pub user: EntityId,
    /// Item interacted with
    pub item: EntityId,
}

impl Interaction {
    /// Create an interaction.
    pub fn new(user: EntityId, item: EntityId) -> Self {
        Self { user, item }
    }
}

/// Which side of an interaction keys a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Group items by user (baskets)
    User,
    /// Group users by item (buyer sets)
    Item,
}

impl Axis {
    /// The group key of `interaction` along this axis.
    #[inline]
    pub fn key(self, interaction: &Interaction) -> EntityId {
        match self {
            Self::User => interaction.user,
            Self::Item => interaction.item,
        }
    }

    /// The group member contributed by `interaction` along this axis.
    #[inline]
    pub fn member(self, interaction: &Interaction) -> EntityId {
        match self {
            Self::User => interaction.item,
            Self::Item => interaction.user,
        }
    }

    /// The complementary axis.
    pub fn other(self) -> Self {
        match self {
            Self::User => Self::Item,
            Self::Item => Self::User,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group key with its sorted, distinct members.
pub type Group = (EntityId, Vec<EntityId>);

/// Deduplicated interaction records, sorted by `(user, item)`.
///
/// # Examples
///
/// ```
/// use llr_similarity::interactions::{Axis, Interaction, Interactions};
///
/// let data = Interactions::from_records(vec![
///     Interaction::new(1, 10),
///     Interaction::new(1, 10),
///     Interaction::new(2, 10),
/// ]);
/// assert_eq!(data.len(), 2);
/// assert_eq!(data.distinct(Axis::User), 2);
/// assert_eq!(data.group_by(Axis::Item), vec![(10, vec![1, 2])]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interactions {
    records: Vec<Interaction>,
}

impl Interactions {
    /// Build a dataset, collapsing duplicate records.
    pub fn from_records<I: IntoIterator<Item = Interaction>>(records: I) -> Self {
        let mut records: Vec<Interaction> = records.into_iter().collect();
        records.sort_unstable();
        records.dedup();
        Self { records }
    }

    /// Build a dataset from `(user, item)` tuples.
    pub fn from_pairs<I: IntoIterator<Item = (EntityId, EntityId)>>(pairs: I) -> Self {
        Self::from_records(pairs.into_iter().map(|(u, i)| Interaction::new(u, i)))
    }

    /// Number of distinct interactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no interactions.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in `(user, item)` order.
    pub fn records(&self) -> &[Interaction] {
        &self.records
    }

    /// Whether `user` interacted with `item`.
    pub fn contains(&self, user: EntityId, item: EntityId) -> bool {
        self.records
            .binary_search(&Interaction::new(user, item))
            .is_ok()
    }

    /// Number of distinct keys along `axis`.
    pub fn distinct(&self, axis: Axis) -> usize {
        match axis {
            Axis::User => {
                // Records are sorted by user, so runs are contiguous.
                self.records
                    .windows(2)
                    .filter(|w| w[0].user != w[1].user)
                    .count()
                    + usize::from(!self.records.is_empty())
            }
            Axis::Item => {
                let mut items: Vec<EntityId> = self.records.iter().map(|r| r.item).collect();
                items.sort_unstable();
                items.dedup();
                items.len()
            }
        }
    }

    /// Group members by key along `axis`, keys ascending, members ascending.
    pub fn group_by(&self, axis: Axis) -> Vec<Group> {
        dataflow::group_by_key(
            self.records
                .iter()
                .map(|r| (axis.key(r), axis.member(r))),
        )
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_unstable();
            (key, members)
        })
        .collect()
    }

    /// Drop items with fewer than `min_users` distinct users.
    #[must_use]
    pub fn retain_items_with_min_users(&self, min_users: usize) -> Self {
        let groups = self.group_by(Axis::Item);
        Self::from_records(
            groups
                .into_iter()
                .filter(|(_, users)| users.len() >= min_users)
                .flat_map(|(item, users)| {
                    users.into_iter().map(move |u| Interaction::new(u, item))
                }),
        )
    }

    /// Limit every group along `axis` to at most `cap` members.
    ///
    /// Oversized groups are down-sampled deterministically: the members with
    /// the smallest [`sample_key`] survive, so the outcome depends only on the
    /// data, not on input order or partitioning. The marginals and
    /// population of the returned dataset reflect the sample.
    ///
    /// # Errors
    ///
    /// Returns [`LlrError::ResourceExhausted`] for the first oversized group
    /// when `policy` is [`GroupCapPolicy::Fail`].
    pub fn cap_groups(
        &self,
        axis: Axis,
        cap: usize,
        policy: GroupCapPolicy,
        reporter: &dyn Reporter,
    ) -> Result<Self> {
        let groups = self.group_by(axis);
        let mut kept = Vec::with_capacity(self.records.len());

        for (anchor, mut members) in groups {
            let size = members.len();
            if size > cap {
                if policy == GroupCapPolicy::Fail {
                    return Err(LlrError::ResourceExhausted { anchor, size, cap });
                }
                members.sort_by_key(|&m| (sample_key(anchor, m), m));
                members.truncate(cap);
                reporter.report(&PipelineEvent::GroupTruncated {
                    axis,
                    anchor,
                    size,
                    cap,
                });
            }
            kept.extend(members.into_iter().map(|m| match axis {
                Axis::User => Interaction::new(anchor, m),
                Axis::Item => Interaction::new(m, anchor),
            }));
        }

        let capped = Self::from_records(kept);
        reporter.report(&PipelineEvent::StageFinished {
            stage: Stage::Cap,
            rows: capped.len(),
        });
        Ok(capped)
    }
}

/// Deterministic pseudo-random key used to sample group members.
///
/// SplitMix64 finalizer over the `(anchor, member)` pair; stable across
/// platforms and releases.
pub fn sample_key(anchor: EntityId, member: EntityId) -> u64 {
    let mut z = (anchor as u64)
        .rotate_left(32)
        .wrapping_add(member as u64)
        .wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl FromIterator<Interaction> for Interactions {
    fn from_iter<I: IntoIterator<Item = Interaction>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}
