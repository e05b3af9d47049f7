//! Side table holding the symmetric blocker/rusher relation.

use std::collections::BTreeMap;

use gridiron_core::{EngagementId, EngagementSnapshot, EntityId};

#[derive(Clone, Copy, Debug)]
struct Link {
    partner: EntityId,
    engagement: EngagementId,
}

#[derive(Clone, Copy, Debug)]
struct Record {
    rusher: EntityId,
    blocker: EntityId,
    elapsed_ticks: u32,
}

/// Engagements keyed by generation plus a per-entity back reference.
///
/// Generations are never reused, so a release naming a finished engagement
/// cannot tear down a newer one between the same players.
#[derive(Debug, Default)]
pub(crate) struct EngagementTable {
    links: BTreeMap<EntityId, Link>,
    records: BTreeMap<EngagementId, Record>,
    next_generation: u32,
}

impl EngagementTable {
    pub(crate) fn engage(&mut self, rusher: EntityId, blocker: EntityId) -> Option<EngagementId> {
        if rusher == blocker
            || self.links.contains_key(&rusher)
            || self.links.contains_key(&blocker)
        {
            return None;
        }

        self.next_generation = self.next_generation.wrapping_add(1);
        let engagement = EngagementId::new(self.next_generation);
        let _ = self.records.insert(
            engagement,
            Record {
                rusher,
                blocker,
                elapsed_ticks: 0,
            },
        );
        let _ = self.links.insert(
            rusher,
            Link {
                partner: blocker,
                engagement,
            },
        );
        let _ = self.links.insert(
            blocker,
            Link {
                partner: rusher,
                engagement,
            },
        );
        Some(engagement)
    }

    /// Removes the engagement and both back references together.
    ///
    /// Returns the `(rusher, blocker)` pair, or `None` for a stale generation.
    pub(crate) fn release(&mut self, engagement: EngagementId) -> Option<(EntityId, EntityId)> {
        let record = self.records.remove(&engagement)?;
        for member in [record.rusher, record.blocker] {
            if self
                .links
                .get(&member)
                .is_some_and(|link| link.engagement == engagement)
            {
                let _ = self.links.remove(&member);
            }
        }
        Some((record.rusher, record.blocker))
    }

    pub(crate) fn engagement_of(&self, entity: EntityId) -> Option<EngagementId> {
        self.links.get(&entity).map(|link| link.engagement)
    }

    pub(crate) fn partner_of(&self, entity: EntityId) -> Option<EntityId> {
        self.links.get(&entity).map(|link| link.partner)
    }

    pub(crate) fn advance(&mut self) {
        for record in self.records.values_mut() {
            record.elapsed_ticks = record.elapsed_ticks.saturating_add(1);
        }
    }

    /// Drops every engagement while keeping the generation counter.
    pub(crate) fn clear(&mut self) {
        self.links.clear();
        self.records.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<EngagementSnapshot> {
        self.records
            .iter()
            .map(|(id, record)| EngagementSnapshot {
                id: *id,
                rusher: record.rusher,
                blocker: record.blocker,
                elapsed_ticks: record.elapsed_ticks,
            })
            .collect()
    }
}
