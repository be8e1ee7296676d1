use std::collections::HashMap;

use mvgrid_algebra::{Mat4F64, Viewpoint};
use mvgrid_grid::OccupancyGrid;
use mvgrid_reproject::BlobLayout;

use crate::sampler::ViewId;

/// Read access to the recorded views of a multi-view dataset.
///
/// Implementors own the storage; the sampler only borrows from them.
pub trait ViewCatalog<T> {
    /// The camera pose a view was recorded from.
    fn viewpoint(&self, id: ViewId) -> Option<Viewpoint>;

    /// The projection matrix of a view.
    fn projection(&self, id: ViewId) -> Option<Mat4F64>;

    /// The predicted grid of a view, as a flat blob with its layout.
    fn prediction(&self, id: ViewId) -> Option<(&[T], BlobLayout)>;

    /// The ground-truth grid of a view, if the dataset has one.
    fn ground_truth(&self, _id: ViewId) -> Option<&OccupancyGrid<T>> {
        None
    }
}

/// Everything recorded for one view.
#[derive(Debug, Clone)]
pub struct ViewRecord<T> {
    /// The camera pose.
    pub viewpoint: Viewpoint,
    /// The projection matrix.
    pub projection: Mat4F64,
    /// The flat predicted blob.
    pub prediction: Vec<T>,
    /// Where the grid is stored in `prediction`.
    pub layout: BlobLayout,
    /// The ground-truth grid, if any.
    pub ground_truth: Option<OccupancyGrid<T>>,
}

/// A [`ViewCatalog`] keeping every record in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog<T> {
    records: HashMap<ViewId, ViewRecord<T>>,
}

impl<T> Default for InMemoryCatalog<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<T> InMemoryCatalog<T> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record of a view.
    pub fn insert(&mut self, id: ViewId, record: ViewRecord<T>) -> Option<ViewRecord<T>> {
        self.records.insert(id, record)
    }

    /// The record of a view.
    pub fn get(&self, id: ViewId) -> Option<&ViewRecord<T>> {
        self.records.get(&id)
    }

    /// The number of recorded views.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> ViewCatalog<T> for InMemoryCatalog<T> {
    fn viewpoint(&self, id: ViewId) -> Option<Viewpoint> {
        self.get(id).map(|r| r.viewpoint)
    }

    fn projection(&self, id: ViewId) -> Option<Mat4F64> {
        self.get(id).map(|r| r.projection)
    }

    fn prediction(&self, id: ViewId) -> Option<(&[T], BlobLayout)> {
        self.get(id).map(|r| (r.prediction.as_slice(), r.layout))
    }

    fn ground_truth(&self, id: ViewId) -> Option<&OccupancyGrid<T>> {
        self.get(id).and_then(|r| r.ground_truth.as_ref())
    }
}
