use crate::detection::bounding_box::BoundingBox;
use serde::Serialize;
use std::slice::Iter;

/// Boxes the detector returned for one image, in detector order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DetectionSet(Vec<BoundingBox>);

impl DetectionSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, BoundingBox> {
        self.0.iter()
    }

    pub fn areas(&self) -> Vec<u64> {
        self.0.iter().map(BoundingBox::area).collect()
    }
}

impl From<Vec<BoundingBox>> for DetectionSet {
    fn from(value: Vec<BoundingBox>) -> Self {
        Self(value)
    }
}

impl FromIterator<BoundingBox> for DetectionSet {
    fn from_iter<T: IntoIterator<Item = BoundingBox>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a BoundingBox;
    type IntoIter = Iter<'a, BoundingBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
