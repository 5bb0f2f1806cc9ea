use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Resource identifier. Equal to the resource's index in the input list.
pub type Rid = usize;

/// A pool of identical units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub rid: Rid,
    pub total: u32,
    available: u32,
}

impl Resource {
    /// A fully available pool.
    pub fn new(rid: Rid, total: u32) -> Self {
        Self {
            rid,
            total,
            available: total,
        }
    }

    /// A pool starting with `available` free units.
    pub fn with_available(rid: Rid, total: u32, available: u32) -> Result<Self, SimulationError> {
        let mut resource = Self::new(rid, total);
        resource.set_available(available)?;
        Ok(resource)
    }

    #[inline]
    pub fn available(&self) -> u32 {
        self.available
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.available == 0
    }

    pub fn set_available(&mut self, available: u32) -> Result<(), SimulationError> {
        if available > self.total {
            return Err(SimulationError::CapacityExceeded {
                rid: self.rid,
                available,
                total: self.total,
            });
        }
        self.available = available;
        Ok(())
    }
}

/// Resource registry keyed by rid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTable {
    resources: BTreeMap<Rid, Resource>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: Resource) {
        self.resources.insert(resource.rid, resource);
    }

    pub fn get(&self, rid: Rid) -> Option<&Resource> {
        self.resources.get(&rid)
    }

    /// Free units of `rid`; an unknown rid has none.
    pub fn available(&self, rid: Rid) -> u32 {
        self.resources.get(&rid).map_or(0, Resource::available)
    }

    #[inline]
    pub fn is_exhausted(&self, rid: Rid) -> bool {
        self.available(rid) == 0
    }

    pub fn set_available(&mut self, rid: Rid, available: u32) -> Result<(), SimulationError> {
        self.resources
            .get_mut(&rid)
            .ok_or(SimulationError::UnknownResource(rid))?
            .set_available(available)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<Resource> for ResourceTable {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut table = Self::new();
        for resource in iter {
            table.insert(resource);
        }
        table
    }
}
