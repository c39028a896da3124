use setupkit_camtools::stock::standard_sizes;
use setupkit_camtools::{
    calculate_stock_dimensions, round_to_standard_size, CylindricalConfig, CylindricalDetector,
    ShapeClass, StockConfig, StockDimensionType, StockOffsets,
};
use setupkit_core::types::FaceCounts;
use setupkit_core::{Axis, BodyGeometry, BoundingBox, MeasurementSystem, Quantity, Unit};

fn body(x: f64, y: f64, z: f64, face_ratio: f64) -> BodyGeometry {
    BodyGeometry {
        bounding_box: Some(BoundingBox::from_mm(x, y, z)),
        cylindrical_face_ratio: Some(face_ratio),
        ..Default::default()
    }
}

#[test]
fn test_offsets_are_asymmetric() {
    let bbox = BoundingBox::from_mm(100.0, 50.0, 20.0);
    let offsets = StockConfig::default().default_offsets();
    let stock =
        calculate_stock_dimensions(&bbox, &offsets, false, MeasurementSystem::Metric).unwrap();

    assert_eq!(stock.width, Quantity::mm(110.0));
    assert_eq!(stock.depth, Quantity::mm(60.0));
    assert_eq!(stock.height, Quantity::mm(22.5));
    assert_eq!(stock.raw_dimensions.height, Quantity::mm(20.0));
    assert_eq!(stock.offsets_applied.xy, Quantity::mm(5.0));
    assert!(!stock.rounded_to_standard);
}

#[test]
fn test_metric_rounding() {
    let bbox = BoundingBox::from_mm(100.0, 50.0, 20.0);
    let offsets = StockOffsets::from_mm(5.0, 2.5);
    let stock =
        calculate_stock_dimensions(&bbox, &offsets, true, MeasurementSystem::Metric).unwrap();

    assert_eq!(stock.dims_mm(), [110.0, 60.0, 25.0]);
    assert!(stock.rounded_to_standard);
}

#[test]
fn test_imperial_rounding_reports_inches() {
    let bbox = BoundingBox::from_mm(100.0, 50.0, 20.0);
    let offsets = StockOffsets::from_mm(5.0, 2.5);
    let stock =
        calculate_stock_dimensions(&bbox, &offsets, true, MeasurementSystem::Imperial).unwrap();

    assert_eq!(stock.width.unit, Unit::Inch);
    assert!((stock.width.value - 4.5).abs() < 1e-9);
    assert!((stock.depth.value - 2.5).abs() < 1e-9);
    assert!((stock.height.value - 1.0).abs() < 1e-9);
    assert_eq!(stock.unit_system, MeasurementSystem::Imperial);
}

#[test]
fn test_round_to_standard_size() {
    let metric = MeasurementSystem::Metric;
    assert_eq!(
        round_to_standard_size(22.5, StockDimensionType::PlateThickness, metric),
        25.0
    );
    assert_eq!(
        round_to_standard_size(25.0, StockDimensionType::PlateThickness, metric),
        25.0
    );
    assert_eq!(
        round_to_standard_size(1.0, StockDimensionType::BarWidth, metric),
        10.0
    );
    assert_eq!(
        round_to_standard_size(500.0, StockDimensionType::BarWidth, metric),
        300.0
    );
    assert_eq!(
        round_to_standard_size(36.0, StockDimensionType::RoundDiameter, metric),
        38.0
    );

    // 0.3 in -> 5/16 in
    let inch = round_to_standard_size(
        0.3 * 25.4,
        StockDimensionType::PlateThickness,
        MeasurementSystem::Imperial,
    );
    assert!((inch - 0.3125 * 25.4).abs() < 1e-9);
}

#[test]
fn test_imperial_values_are_stable() {
    for size in standard_sizes(StockDimensionType::RoundDiameter, MeasurementSystem::Imperial) {
        let mm = size * 25.4;
        let rounded = round_to_standard_size(
            mm,
            StockDimensionType::RoundDiameter,
            MeasurementSystem::Imperial,
        );
        assert!((rounded - mm).abs() < 1e-9, "{} in", size);
    }
}

#[test]
fn test_elongated_bar_is_cylindrical() {
    let detector = CylindricalDetector::default();
    let result = detector.detect(&body(20.0, 20.0, 100.0, 0.8));

    assert!(result.is_cylindrical);
    assert_eq!(result.shape, ShapeClass::Elongated);
    assert_eq!(result.shape_score, 1.0);
    assert_eq!(result.confidence, 0.88);
    assert_eq!(result.cylinder_axis, Some(Axis::Z));
    assert_eq!(result.enclosing_diameter, Quantity::mm(28.28));
    assert!(result.trade_offs.is_some());
    assert!(result.reasoning.contains("Elongated shape (ratio 5.0:1)"));
    assert!(result.reasoning.contains("Elongated profile suitable for turning"));
    assert!(result.reasoning.contains("Confidence: 88%"));
}

#[test]
fn test_disc_is_cylindrical() {
    let detector = CylindricalDetector::default();
    let result = detector.detect(&body(80.0, 80.0, 10.0, 0.5));

    assert_eq!(result.shape, ShapeClass::Disc);
    assert_eq!(result.shape_score, 0.938);
    assert_eq!(result.confidence, 0.675);
    assert!(result.is_cylindrical);
    assert_eq!(result.cylinder_axis, Some(Axis::Z));
    assert_eq!(result.enclosing_diameter, Quantity::mm(113.14));
    assert!(result.reasoning.contains("Disc/flange shape (thin axis: 10.0mm)"));
}

#[test]
fn test_prismatic_block_is_not_cylindrical() {
    let detector = CylindricalDetector::default();
    let result = detector.detect(&body(100.0, 60.0, 20.0, 0.1));

    assert!(!result.is_cylindrical);
    assert_eq!(result.shape, ShapeClass::Prismatic);
    assert!(result.cylinder_axis.is_none());
    assert!(result.trade_offs.is_none());
    assert!(result.reasoning.contains("Slightly elongated (ratio 2.5:1)"));
    assert!(result.reasoning.contains("Below cylindrical threshold (50%)"));
}

#[test]
fn test_cube_and_face_counts() {
    let detector = CylindricalDetector::default();
    let mut cube = body(50.0, 50.0, 50.0, 0.0);
    cube.cylindrical_face_ratio = None;
    cube.face_counts = Some(FaceCounts {
        cylindrical: 2,
        planar: 6,
        total: 8,
        has_complex_surfaces: false,
    });
    let result = detector.detect(&cube);

    assert_eq!(result.face_ratio, 0.25);
    assert_eq!(result.shape_score, 0.0);
    assert!(!result.is_cylindrical);
    assert!(result.reasoning.contains("Cubic/prismatic shape - not cylindrical"));
    assert!(result.reasoning.contains("Cylindrical faces: 2/8 (25%)"));
}

#[test]
fn test_zero_extent_is_not_cylindrical() {
    let detector = CylindricalDetector::default();
    let result = detector.detect(&body(0.0, 20.0, 100.0, 1.0));
    assert!(!result.is_cylindrical);
    assert_eq!(result.confidence, 0.0);

    let result = detector.detect(&BodyGeometry::default());
    assert!(!result.is_cylindrical);
}

#[test]
fn test_custom_threshold() {
    let detector = CylindricalDetector::new(CylindricalConfig {
        threshold: 0.9,
        ..Default::default()
    });
    assert!(!detector.detect(&body(20.0, 20.0, 100.0, 0.8)).is_cylindrical);
}
