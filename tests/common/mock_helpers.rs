//! Mock construction helpers

use sensorview::backend::MemoryDataSource;
use sensorview::{Session, Signal};
use std::sync::Arc;

use super::builders::SessionBuilder;

/// Create a memory source holding one generated session
pub fn create_test_source(builder: SessionBuilder) -> (Arc<MemoryDataSource>, Session) {
    let counts = builder.counts();
    let session = builder.build();
    let source = Arc::new(MemoryDataSource::new());
    source.insert_generated(session.clone(), &counts);
    (source, session)
}

/// A completed 1000 s session with ECG, ADC and TEMP data
pub fn create_standard_session() -> (Arc<MemoryDataSource>, Session) {
    create_test_source(
        SessionBuilder::new("20250307_000000")
            .ended_after(1000)
            .total(Signal::Ecg, 250_000)
            .total(Signal::Adc, 250_000)
            .total(Signal::Temp, 500),
    )
}
