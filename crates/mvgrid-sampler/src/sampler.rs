use mvgrid_grid::OccupancyGrid;
use mvgrid_reproject::{rotate_buffer, unpack_grid, ExecutionStrategy};
use num_traits::Float;
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};

use crate::{
    aggregate::average_grids, catalog::ViewCatalog, config::ViewSamplerConfig,
    error::SamplerError,
};

/// Identifies one recorded view of one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId {
    /// Index of the object.
    pub object: usize,
    /// Index of the view within the object.
    pub view: usize,
}

impl ViewId {
    /// Create a new view id.
    pub fn new(object: usize, view: usize) -> Self {
        Self { object, view }
    }

    /// Split a flat dataset index, where views of one object are contiguous.
    pub fn from_flat(index: usize, views_per_object: usize) -> Self {
        Self {
            object: index / views_per_object,
            view: index % views_per_object,
        }
    }

    /// The flat dataset index of the view.
    pub fn flat(&self, views_per_object: usize) -> usize {
        self.object * views_per_object + self.view
    }
}

/// Where the grid of a sampled example comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSource {
    /// The ground-truth grid of the anchor view.
    GroundTruth,
    /// The mean of predictions reprojected into the anchor view.
    Reprojected,
}

/// A grid assembled for one anchor view.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledGrid<T> {
    /// The grid, expressed in the anchor viewpoint.
    pub grid: OccupancyGrid<T>,
    /// How the grid was obtained.
    pub source: GridSource,
    /// The views that contributed to the grid.
    pub views: Vec<ViewId>,
}

/// Draws random view combinations and assembles multi-view grids.
///
/// Sampling is deterministic for a given seed.
pub struct ViewSampler<R = StdRng> {
    config: ViewSamplerConfig,
    rng: R,
}

impl ViewSampler<StdRng> {
    /// Create a sampler seeded from `config.random_seed`, or from the thread
    /// rng when no seed is set.
    pub fn from_config(config: ViewSamplerConfig) -> Result<Self, SamplerError> {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::new(config, rng)
    }

    /// Create a sampler with a fixed seed, ignoring `config.random_seed`.
    pub fn from_seed(config: ViewSamplerConfig, seed: u64) -> Result<Self, SamplerError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ViewSampler<R> {
    /// Create a sampler drawing from `rng`.
    ///
    /// # Errors
    ///
    /// If the configuration is inconsistent, an error is returned.
    pub fn new(config: ViewSamplerConfig, rng: R) -> Result<Self, SamplerError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// The sampler parameters.
    pub fn config(&self) -> &ViewSamplerConfig {
        &self.config
    }

    /// Draw the number of views of one example, uniformly in `[1, max_views]`.
    pub fn draw_view_count(&mut self) -> usize {
        self.rng.random_range(1..=self.config.max_views)
    }

    /// Draw distinct views from the candidate range, all different from `current`.
    ///
    /// The views are drawn uniformly without replacement and returned in the
    /// order they were drawn.
    ///
    /// # Arguments
    ///
    /// * `current` - The view index to exclude.
    /// * `count` - The number of views to draw.
    ///
    /// # Errors
    ///
    /// If the range holds fewer than `count` views besides `current`, an error
    /// is returned.
    pub fn draw_other_views(&mut self, current: usize, count: usize) -> Result<Vec<usize>, SamplerError> {
        let candidates = (self.config.candidate_start..=self.config.candidate_end)
            .filter(|&v| v != current)
            .collect::<Vec<_>>();

        if count > candidates.len() {
            return Err(SamplerError::NotEnoughCandidates {
                requested: count,
                available: candidates.len(),
            });
        }

        Ok(candidates
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect())
    }

    /// Decide whether the next example uses the ground truth.
    pub fn choose_source(&mut self) -> GridSource {
        if self.rng.random_bool(self.config.ground_truth_prob) {
            GridSource::GroundTruth
        } else {
            GridSource::Reprojected
        }
    }

    /// Assemble the grid of one example for the `anchor` view.
    ///
    /// With probability `ground_truth_prob` the anchor's ground truth is
    /// returned as is. Otherwise a view count is drawn, the other views of the
    /// same object are drawn without replacement, and their predictions are
    /// reprojected into the anchor viewpoint, each with its own projection.
    /// When `include_anchor` is set, the anchor prediction is one of the
    /// counted views. The result is the mean of all grids.
    ///
    /// # Arguments
    ///
    /// * `anchor` - The view the example is expressed in.
    /// * `catalog` - The recorded views.
    /// * `strategy` - How each reprojection is scheduled.
    ///
    /// # Errors
    ///
    /// If a needed record is missing, or a reprojection fails, an error is
    /// returned.
    pub fn sample_example<T, C>(
        &mut self,
        anchor: ViewId,
        catalog: &C,
        strategy: ExecutionStrategy,
    ) -> Result<SampledGrid<T>, SamplerError>
    where
        T: Float + Send + Sync,
        C: ViewCatalog<T>,
    {
        if self.choose_source() == GridSource::GroundTruth {
            let grid = catalog
                .ground_truth(anchor)
                .ok_or(SamplerError::MissingView(anchor))?;
            return Ok(SampledGrid {
                grid: grid.clone(),
                source: GridSource::GroundTruth,
                views: vec![anchor],
            });
        }

        let now = std::time::Instant::now();

        let dst = catalog
            .viewpoint(anchor)
            .ok_or(SamplerError::MissingView(anchor))?;

        let num_views = self.draw_view_count();
        let num_others = if self.config.include_anchor {
            num_views - 1
        } else {
            num_views
        };
        let others = self.draw_other_views(anchor.view, num_others)?;

        let mut grids = Vec::with_capacity(num_views);
        let mut views = Vec::with_capacity(num_views);

        if self.config.include_anchor {
            let (blob, layout) = catalog
                .prediction(anchor)
                .ok_or(SamplerError::MissingView(anchor))?;
            grids.push(unpack_grid(blob, &layout)?);
            views.push(anchor);
        }

        for view in others {
            let id = ViewId::new(anchor.object, view);
            let missing = || SamplerError::MissingView(id);

            let src = catalog.viewpoint(id).ok_or_else(missing)?;
            let proj = catalog.projection(id).ok_or_else(missing)?;
            let (blob, layout) = catalog.prediction(id).ok_or_else(missing)?;

            let size = layout.grid_size();
            let mut rotated = vec![T::zero(); size * size * size];
            rotate_buffer(blob, &layout, &src, &dst, &proj, &mut rotated, strategy)?;

            grids.push(OccupancyGrid::new(size, rotated)?);
            views.push(id);
        }

        let grid = average_grids(&grids)?;
        log::debug!(
            "aggregated {} views for {:?} in {:?}",
            views.len(),
            anchor,
            now.elapsed()
        );

        Ok(SampledGrid {
            grid,
            source: GridSource::Reprojected,
            views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, ViewRecord};
    use approx::assert_relative_eq;
    use mvgrid_algebra::{Mat4F64, Viewpoint};
    use mvgrid_reproject::{BlobLayout, BlobShape};

    const SIZE: usize = 8;

    fn record(view: usize) -> Result<ViewRecord<f32>, SamplerError> {
        let yaw = view as f64 * std::f64::consts::TAU / 13.0;
        Ok(ViewRecord {
            viewpoint: Viewpoint::new(
                Mat4F64::from_rotation_y(yaw),
                Mat4F64::from_translation([0.0, 0.0, -5.0]),
            ),
            projection: Mat4F64::perspective(std::f64::consts::FRAC_PI_2, 1.0, 2.0, 10.0),
            // a constant grid stays constant under any reprojection
            prediction: vec![view as f32; SIZE * SIZE * SIZE],
            layout: BlobLayout::new(BlobShape::new(SIZE, SIZE, SIZE)),
            ground_truth: Some(OccupancyGrid::from_size_val(SIZE, 100.0 + view as f32)?),
        })
    }

    fn catalog(object: usize) -> Result<InMemoryCatalog<f32>, SamplerError> {
        let mut catalog = InMemoryCatalog::new();
        for view in 0..13 {
            catalog.insert(ViewId::new(object, view), record(view)?);
        }
        Ok(catalog)
    }

    #[test]
    fn test_view_id_flat() {
        let id = ViewId::from_flat(29, 13);
        assert_eq!(id, ViewId::new(2, 3));
        assert_eq!(id.flat(13), 29);
    }

    #[test]
    fn test_draw_other_views_distinct() -> Result<(), SamplerError> {
        let mut sampler = ViewSampler::from_seed(ViewSamplerConfig::default(), 0)?;
        for current in 0..13 {
            for count in [0, 1, 5, 12] {
                let views = sampler.draw_other_views(current, count)?;
                assert_eq!(views.len(), count);
                assert!(views.iter().all(|&v| v != current && v <= 12));

                let mut sorted = views.clone();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(sorted.len(), count);
            }
        }
        Ok(())
    }

    #[test]
    fn test_draw_other_views_not_enough() -> Result<(), SamplerError> {
        let config = ViewSamplerConfig {
            candidate_start: 1,
            candidate_end: 7,
            max_views: 1,
            include_anchor: false,
            ..Default::default()
        };
        let mut sampler = ViewSampler::from_seed(config, 3)?;

        // the current view lies in the range
        assert_eq!(
            sampler.draw_other_views(4, 7),
            Err(SamplerError::NotEnoughCandidates {
                requested: 7,
                available: 6
            })
        );
        // the current view lies outside the range
        assert_eq!(sampler.draw_other_views(0, 7)?.len(), 7);
        Ok(())
    }

    #[test]
    fn test_seeded_determinism() -> Result<(), SamplerError> {
        let mut a = ViewSampler::from_seed(ViewSamplerConfig::default(), 42)?;
        let mut b = ViewSampler::from_config(ViewSamplerConfig {
            random_seed: Some(42),
            ..Default::default()
        })?;
        for current in 0..13 {
            assert_eq!(a.draw_view_count(), b.draw_view_count());
            assert_eq!(a.draw_other_views(current, 3)?, b.draw_other_views(current, 3)?);
        }
        Ok(())
    }

    #[test]
    fn test_draw_view_count_range() -> Result<(), SamplerError> {
        let mut sampler = ViewSampler::from_seed(ViewSamplerConfig::default(), 5)?;
        let counts = (0..500).map(|_| sampler.draw_view_count()).collect::<Vec<_>>();
        assert!(counts.iter().all(|c| (1..=4).contains(c)));
        assert!(counts.contains(&1) && counts.contains(&4));
        Ok(())
    }

    #[test]
    fn test_choose_source_extremes() -> Result<(), SamplerError> {
        let mut never = ViewSampler::from_seed(ViewSamplerConfig::default(), 1)?;
        let mut always = ViewSampler::from_seed(
            ViewSamplerConfig {
                ground_truth_prob: 1.0,
                ..Default::default()
            },
            1,
        )?;
        for _ in 0..100 {
            assert_eq!(never.choose_source(), GridSource::Reprojected);
            assert_eq!(always.choose_source(), GridSource::GroundTruth);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ViewSamplerConfig {
            max_views: 0,
            ..Default::default()
        };
        assert!(matches!(
            ViewSampler::from_seed(config, 0),
            Err(SamplerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sample_example_mean() -> Result<(), SamplerError> {
        let _ = env_logger::builder().is_test(true).try_init();

        let catalog = catalog(1)?;
        let mut sampler = ViewSampler::from_seed(ViewSamplerConfig::default(), 7)?;
        let anchor = ViewId::new(1, 5);

        for _ in 0..20 {
            let sample = sampler.sample_example(anchor, &catalog, ExecutionStrategy::Serial)?;
            assert_eq!(sample.source, GridSource::Reprojected);
            assert!((1..=4).contains(&sample.views.len()));
            assert_eq!(sample.views[0], anchor);
            assert!(sample.views[1..].iter().all(|id| id.object == 1 && id.view != 5));

            let expected =
                sample.views.iter().map(|id| id.view as f32).sum::<f32>() / sample.views.len() as f32;
            assert_eq!(sample.grid.size(), SIZE);
            for v in sample.grid.as_slice() {
                assert_relative_eq!(*v, expected, epsilon = 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn test_sample_example_without_anchor() -> Result<(), SamplerError> {
        let config = ViewSamplerConfig {
            candidate_start: 1,
            candidate_end: 7,
            max_views: 1,
            include_anchor: false,
            ..Default::default()
        };
        let catalog = catalog(0)?;
        let mut sampler = ViewSampler::from_seed(config, 11)?;
        let anchor = ViewId::new(0, 9);

        let sample = sampler.sample_example(anchor, &catalog, ExecutionStrategy::default())?;
        assert_eq!(sample.views.len(), 1);

        let other = sample.views[0];
        assert!((1..=7).contains(&other.view));
        assert!(sample.grid.as_slice().iter().all(|&v| v == other.view as f32));
        Ok(())
    }

    #[test]
    fn test_sample_example_ground_truth() -> Result<(), SamplerError> {
        let config = ViewSamplerConfig {
            ground_truth_prob: 1.0,
            ..Default::default()
        };
        let catalog = catalog(0)?;
        let mut sampler = ViewSampler::from_seed(config, 0)?;

        let sample = sampler.sample_example(ViewId::new(0, 2), &catalog, ExecutionStrategy::Serial)?;
        assert_eq!(sample.source, GridSource::GroundTruth);
        assert_eq!(sample.views, vec![ViewId::new(0, 2)]);
        assert!(sample.grid.as_slice().iter().all(|&v| v == 102.0));
        Ok(())
    }

    #[test]
    fn test_sample_example_missing_view() -> Result<(), SamplerError> {
        let config = ViewSamplerConfig {
            max_views: 1,
            include_anchor: false,
            ..Default::default()
        };
        let mut catalog = InMemoryCatalog::new();
        let anchor = ViewId::new(0, 0);
        catalog.insert(anchor, record(0)?);

        let mut sampler = ViewSampler::from_seed(config, 0)?;
        let res = sampler.sample_example(anchor, &catalog, ExecutionStrategy::Serial);
        assert!(matches!(
            res,
            Err(SamplerError::MissingView(ViewId { object: 0, view })) if view != 0
        ));
        Ok(())
    }
}
