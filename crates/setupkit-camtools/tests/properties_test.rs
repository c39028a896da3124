use proptest::prelude::*;
use setupkit_camtools::stock::standard_sizes;
use setupkit_camtools::{
    calculate_stock_dimensions, round_to_standard_size, ConfidenceScorer, DetectionSource,
    OrientationAnalyzer, StockDimensionType, StockOffsets,
};
use setupkit_core::{BoundingBox, Feature, MeasurementSystem};

fn source() -> impl Strategy<Value = DetectionSource> {
    prop_oneof![
        Just(DetectionSource::ApiProvided),
        Just(DetectionSource::DerivedGeometry),
        Just(DetectionSource::Heuristic),
    ]
}

fn dim_type() -> impl Strategy<Value = StockDimensionType> {
    prop_oneof![
        Just(StockDimensionType::PlateThickness),
        Just(StockDimensionType::BarWidth),
        Just(StockDimensionType::RoundDiameter),
    ]
}

fn system() -> impl Strategy<Value = MeasurementSystem> {
    prop_oneof![
        Just(MeasurementSystem::Metric),
        Just(MeasurementSystem::Imperial)
    ]
}

fn table_max_mm(dim: StockDimensionType, system: MeasurementSystem) -> f64 {
    let max = standard_sizes(dim, system).last().copied().unwrap_or(0.0);
    match system {
        MeasurementSystem::Metric => max,
        MeasurementSystem::Imperial => max * 25.4,
    }
}

proptest! {
    #[test]
    fn confidence_stays_within_bounds(
        src in source(),
        complexity in -20i32..40,
        flag_count in 0usize..12,
    ) {
        let scorer = ConfidenceScorer::default();
        let flags: Vec<String> = (0..flag_count).map(|i| format!("flag {}", i)).collect();
        let result = scorer.calculate_confidence(src, complexity, &flags);
        prop_assert!(result.score >= 0.30);
        prop_assert!(result.score <= scorer.config().base_for(src));
    }

    #[test]
    fn rounding_never_goes_down(value in 0.1f64..400.0, dim in dim_type(), sys in system()) {
        let value = value.min(table_max_mm(dim, sys));
        let rounded = round_to_standard_size(value, dim, sys);
        prop_assert!(rounded >= value - 1e-9);
    }

    #[test]
    fn rounding_is_idempotent(value in 0.1f64..400.0, dim in dim_type(), sys in system()) {
        let once = round_to_standard_size(value, dim, sys);
        let twice = round_to_standard_size(once, dim, sys);
        prop_assert!((once - twice).abs() < 1e-9);
    }

    #[test]
    fn offsets_are_exact(
        x in 1.0f64..500.0,
        y in 1.0f64..500.0,
        z in 1.0f64..200.0,
        xy in 0.0f64..20.0,
        zo in 0.0f64..20.0,
    ) {
        let bbox = BoundingBox::from_mm(x, y, z);
        let stock = calculate_stock_dimensions(
            &bbox,
            &StockOffsets::from_mm(xy, zo),
            false,
            MeasurementSystem::Metric,
        ).unwrap();
        prop_assert_eq!(stock.width.value, x + 2.0 * xy);
        prop_assert_eq!(stock.depth.value, y + 2.0 * xy);
        prop_assert_eq!(stock.height.value, z + zo);
    }

    #[test]
    fn orientation_scores_are_ranked(
        x in 1.0f64..300.0,
        y in 1.0f64..300.0,
        z in 1.0f64..300.0,
        normals in prop::collection::vec(
            prop_oneof![
                Just(None),
                Just(Some([0.0, 0.0, 1.0])),
                Just(Some([0.0, 0.0, -1.0])),
                Just(Some([-1.0, 0.0, 0.0])),
                Just(Some([0.0, -1.0, 0.0])),
            ],
            0..8,
        ),
    ) {
        let features: Vec<Feature> = normals
            .into_iter()
            .map(|n| {
                let mut hole = Feature::hole(5.0, 5.0);
                hole.approach_normal = n;
                hole
            })
            .collect();
        let candidates = OrientationAnalyzer::default()
            .suggest_orientations(&BoundingBox::from_mm(x, y, z), &features)
            .unwrap();

        prop_assert_eq!(candidates.len(), 3);
        for c in &candidates {
            prop_assert!((0.0..=1.0).contains(&c.score));
            prop_assert!(candidates[0].score >= c.score);
        }
    }
}
