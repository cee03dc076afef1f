//! End-to-end properties of the resampling pipeline

use tr_core::interpolate::interpolate_at;
use tr_core::leaderboard::standings;
use tr_core::model::{Alignment, DriverCode, DriverSample, DriverSeries, RaceData};
use tr_core::normalize::normalize_series;
use tr_core::{assemble, NormalizationScope, PipelineOptions, Playback};

/// Irregularly sampled lap of an oval in raw track units
fn oval_driver(code: &str, start: f64, samples: usize, phase: f64) -> DriverSeries {
    let mut t = start;
    let points = (0..samples)
        .map(|i| {
            let angle = phase + i as f64 * 0.15;
            let sample = DriverSample::new(
                t,
                -3500.0 + angle.cos() * 2100.0,
                1200.0 + angle.sin() * 900.0,
                (i / 40) as u32 + 1,
            );
            t += 0.25 + (i % 3) as f64 * 0.1;
            sample
        })
        .collect();
    DriverSeries::new(DriverCode::new(code).unwrap(), points)
}

fn grid() -> Vec<DriverSeries> {
    vec![
        oval_driver("VER", 3380.0, 120, 0.0),
        oval_driver("LEC", 3380.4, 90, 0.3),
        oval_driver("NOR", 3379.1, 140, 0.6),
    ]
}

fn options(alignment: Alignment) -> PipelineOptions {
    PipelineOptions {
        fps: 5.0,
        alignment,
        scope: NormalizationScope::PerDriver,
    }
}

#[test]
fn test_two_driver_example_raw_and_normalized() {
    let a = DriverSeries::new(
        DriverCode::new("A").unwrap(),
        vec![DriverSample::new(0.0, 0.0, 0.0, 1), DriverSample::new(10.0, 10.0, 0.0, 1)],
    );
    let b = DriverSeries::new(
        DriverCode::new("B").unwrap(),
        vec![DriverSample::new(0.0, 0.0, 5.0, 1), DriverSample::new(5.0, 5.0, 5.0, 1)],
    );

    // Raw interpolation
    assert_eq!(interpolate_at(a.samples(), 5.0).unwrap().x, 5.0);
    let raw_b = interpolate_at(b.samples(), 5.0).unwrap();
    assert_eq!((raw_b.x, raw_b.y), (5.0, 5.0));

    // Normalized, via the full pipeline
    let data = assemble(&[a, b], &options(Alignment::Union)).unwrap();
    assert_eq!(data.total_frames(), 3);
    let frame = &data.frames[1];
    assert_eq!(frame.time_sec, Some(5.0));
    assert_eq!(frame.drivers[0].x, 0.5);
    assert_eq!(frame.drivers[1].x, 1.0);
}

#[test]
fn test_normalized_positions_stay_in_unit_square() {
    for alignment in [Alignment::Union, Alignment::FixedRate, Alignment::LegacyStride] {
        let data = assemble(&grid(), &options(alignment)).unwrap();
        for frame in &data.frames {
            for entry in &frame.drivers {
                assert!((0.0..=1.0).contains(&entry.x), "{alignment:?} x={}", entry.x);
                assert!((0.0..=1.0).contains(&entry.y), "{alignment:?} y={}", entry.y);
            }
        }
    }
}

#[test]
fn test_union_frames_hit_every_knot_exactly() {
    let series = grid();
    let data = assemble(&series, &options(Alignment::Union)).unwrap();
    let origin = series
        .iter()
        .filter_map(|s| s.time_range())
        .map(|(start, _)| start)
        .fold(f64::INFINITY, f64::min);

    // Every NOR sample time is in the union; the frame there must carry
    // exactly the normalized sample
    let nor = normalize_series(&series[2]).unwrap();
    for sample in &nor.samples {
        let frame = data
            .frames
            .iter()
            .find(|f| f.time_sec == Some(sample.time - origin))
            .expect("union timeline contains every sample time");
        let entry = &frame.drivers[2];
        assert_eq!((entry.x, entry.y, entry.lap), (sample.x, sample.y, sample.lap));
    }
}

#[test]
fn test_artifact_round_trips_through_json() {
    let data = assemble(&grid(), &options(Alignment::FixedRate)).unwrap();
    let json = data.to_json(true).unwrap();
    let parsed = RaceData::from_json(&json).unwrap();

    assert_eq!(parsed.drivers, data.drivers);
    assert_eq!(parsed.total_frames(), data.total_frames());
    assert_eq!(parsed.to_json(true).unwrap(), json);
}

#[test]
fn test_playback_over_assembled_artifact() {
    let data = assemble(&grid(), &options(Alignment::FixedRate)).unwrap();
    let total = data.total_frames();
    let mut playback = Playback::new(data);

    assert_eq!(playback.duration_secs(), total as f64 / 5.0);
    playback.seek(4.0);
    assert_eq!(playback.current_frame(), 20);

    let frame = playback.current().unwrap();
    let rows = standings(frame);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].position, 1);
}
