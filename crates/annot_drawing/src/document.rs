use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementPatch, Point};

/// Committed elements of one canvas, in z-order (last is topmost).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append on top. Rejects an element whose id is already present.
    pub fn push(&mut self, element: Element) -> bool {
        if self.contains(element.id()) {
            tracing::warn!(id = %element.id(), "element already in document");
            return false;
        }
        self.elements.push(element);
        true
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.position(id)?;
        Some(self.elements.remove(index))
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    /// Z-index of an element.
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn set_position(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.set_position(x, y);
                true
            }
            None => false,
        }
    }

    pub fn apply_patch(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Topmost element whose bounding box contains `point`.
    ///
    /// Freehand strokes are never returned.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(point.x, point.y))
            .map(Element::id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Image payloads referenced by pasted images.
    pub fn image_payloads(&self) -> impl Iterator<Item = &Arc<str>> {
        self.elements.iter().filter_map(|e| e.image.as_ref())
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
