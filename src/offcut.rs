//! Arena of leftover strips produced by lamination, reusable by later build
//! steps.
//!
//! Offcuts are identified by their position in generation order. A build
//! step may only consume an offcut generated by a strictly earlier step;
//! whatever is left when the run ends is discarded.

use crate::types::{Axis, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffcutId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Offcut {
    pub id: OffcutId,
    /// Catalog index of the stock the strip was ripped from.
    pub source_stock: usize,
    pub axis: Axis,
    /// Size along the laminated axis.
    pub dimension: f64,
    pub length: f64,
    pub generated_by: usize,
    pub consumed_by: Option<usize>,
}

impl Offcut {
    pub fn is_available_to(&self, build_index: usize) -> bool {
        self.consumed_by.is_none() && self.generated_by < build_index
    }
}

#[derive(Debug, Clone, Default)]
pub struct OffcutPool {
    offcuts: Vec<Offcut>,
    /// Unconsumed offcuts in generation order. Lookups scan only these.
    available: Vec<OffcutId>,
}

impl OffcutPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        source_stock: usize,
        axis: Axis,
        dimension: f64,
        length: f64,
        generated_by: usize,
    ) -> OffcutId {
        let id = OffcutId(self.offcuts.len());
        self.offcuts.push(Offcut {
            id,
            source_stock,
            axis,
            dimension,
            length,
            generated_by,
            consumed_by: None,
        });
        self.available.push(id);
        id
    }

    pub fn get(&self, id: OffcutId) -> Option<&Offcut> {
        self.offcuts.get(id.0)
    }

    /// Offcuts usable by `build_index` for gluing `axis` of a part at least
    /// `min_length` long from `source_stock`, oldest first.
    pub fn eligible(
        &self,
        source_stock: usize,
        axis: Axis,
        min_length: f64,
        build_index: usize,
    ) -> impl Iterator<Item = &Offcut> {
        self.available
            .iter()
            .map(move |id| &self.offcuts[id.0])
            .filter(move |o| {
                o.source_stock == source_stock
                    && o.axis == axis
                    && o.length >= min_length - EPSILON
                    && o.is_available_to(build_index)
            })
    }

    /// Marks an offcut as used by `build_index`. Returns false, leaving the
    /// pool untouched, if the offcut is unknown, already consumed, or was not
    /// generated strictly before `build_index`.
    pub fn consume(&mut self, id: OffcutId, build_index: usize) -> bool {
        match self.offcuts.get_mut(id.0) {
            Some(offcut) if offcut.is_available_to(build_index) => {
                offcut.consumed_by = Some(build_index);
                // Order of the rest is kept so lookups stay oldest first.
                self.available.retain(|&other| other != id);
                true
            }
            _ => false,
        }
    }

    /// Every offcut ever registered, consumed or not.
    pub fn iter(&self) -> impl Iterator<Item = &Offcut> {
        self.offcuts.iter()
    }

    pub fn generated(&self) -> usize {
        self.offcuts.len()
    }

    /// Offcuts never consumed.
    pub fn unconsumed(&self) -> usize {
        self.available.len()
    }
}
