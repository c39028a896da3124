use setupkit_core::{BodyGeometry, BoundingBox, Feature, Tool, ToolId, ToolType};
use setupkit_learning::{
    FeedbackEvent, FeedbackFilter, FeedbackStore, NewFeedback, PreferenceStore, StockPreference,
    StoreError, StoreResult, StrategyPreference,
};

/// Small plate: four reachable holes and one flagged from below
pub fn hole_plate() -> BodyGeometry {
    let mut flagged = Feature::hole(3.0, 3.0);
    flagged.unreachable_in_3axis = true;
    let mut geometry = BodyGeometry::new(
        BoundingBox::from_mm(14.0, 14.0, 3.0),
        vec![
            Feature::hole(3.0, 3.0),
            Feature::hole(3.0, 3.0),
            Feature::hole(3.0, 3.0),
            Feature::hole(3.0, 3.0),
            flagged,
        ],
    );
    geometry.name = Some("Bracket".to_string());
    geometry
}

/// Block whose best orientation falls below the threshold
pub fn ambiguous_block() -> BodyGeometry {
    let mut flagged = Feature::hole(5.0, 10.0);
    flagged.unreachable_in_3axis = true;
    BodyGeometry::new(
        BoundingBox::from_mm(100.0, 60.0, 20.0),
        vec![flagged, Feature::hole(5.0, 10.0)],
    )
}

/// Thin plate whose best orientation lands just under the threshold (0.69)
pub fn thin_plate() -> BodyGeometry {
    let mut flagged = Feature::hole(4.0, 5.0);
    flagged.unreachable_in_3axis = true;
    BodyGeometry::new(
        BoundingBox::from_mm(100.0, 100.0, 5.0),
        vec![
            Feature::hole(4.0, 5.0),
            Feature::hole(4.0, 5.0),
            Feature::hole(4.0, 5.0),
            flagged,
        ],
    )
}

/// Block scoring Z_UP 0.65, Y_UP 0.61, X_UP 0.49.
///
/// Each hole opens onto one face, so it is unreachable from the axis whose
/// tool approaches that face from behind.
pub fn spread_block() -> BodyGeometry {
    let hole = |normal: [f64; 3]| {
        let mut f = Feature::hole(3.0, 4.0);
        f.approach_normal = Some(normal);
        f
    };
    BodyGeometry::new(
        BoundingBox::from_mm(10.0, 40.0, 8.0),
        vec![
            hole([0.0, 0.0, -1.0]),
            hole([0.0, -1.0, 0.0]),
            hole([-1.0, 0.0, 0.0]),
            hole([-1.0, 0.0, 0.0]),
        ],
    )
}

/// Shaft along Z with mostly cylindrical faces
pub fn shaft() -> BodyGeometry {
    let mut geometry = BodyGeometry::new(BoundingBox::from_mm(30.0, 30.0, 100.0), Vec::new());
    geometry.cylindrical_face_ratio = Some(0.8);
    geometry
}

pub fn drill(number: u32, diameter_mm: f64, flute_mm: f64) -> Tool {
    Tool::new(
        ToolId(format!("drill-{}", number)),
        number,
        ToolType::Drill,
        diameter_mm,
    )
    .with_flute_length(flute_mm)
    .with_flutes(2)
}

pub fn endmill(number: u32, diameter_mm: f64, flute_mm: f64) -> Tool {
    Tool::new(
        ToolId(format!("em-{}", number)),
        number,
        ToolType::FlatEndmill,
        diameter_mm,
    )
    .with_flute_length(flute_mm)
    .with_flutes(3)
}

/// Store whose backend is always down
#[derive(Debug, Default)]
pub struct OfflineStore;

fn offline<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection refused".to_string()))
}

impl PreferenceStore for OfflineStore {
    fn get_stock_preference(&self, _: &str, _: &str) -> StoreResult<Option<StockPreference>> {
        offline()
    }

    fn save_stock_preference(&self, _: StockPreference) -> StoreResult<StockPreference> {
        offline()
    }

    fn get_strategy_preference(
        &self,
        _: &str,
        _: &str,
    ) -> StoreResult<Option<StrategyPreference>> {
        offline()
    }

    fn save_strategy_preference(&self, _: StrategyPreference) -> StoreResult<StrategyPreference> {
        offline()
    }
}

impl FeedbackStore for OfflineStore {
    fn append_feedback(&self, _: NewFeedback) -> StoreResult<FeedbackEvent> {
        offline()
    }

    fn query_feedback(&self, _: &FeedbackFilter) -> StoreResult<Vec<FeedbackEvent>> {
        offline()
    }

    fn delete_feedback(&self, _: Option<&str>) -> StoreResult<usize> {
        offline()
    }
}
