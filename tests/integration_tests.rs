use swathgrid::compute::geometry::spherical_cosines;
use swathgrid::{
    Config, EARTH_RADIUS_METERS, Match, NO_DATA, PointSet, Resampler, ResamplerBuilder,
};

/// Deterministic xorshift stream so runs are reproducible without extra crates.
struct Stream(u64);

impl Stream {
    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn scatter(stream: &mut Stream, n: usize, lat: (f64, f64), lon: (f64, f64)) -> (Vec<f64>, Vec<f64>) {
    let lats = (0..n).map(|_| stream.range(lat.0, lat.1)).collect();
    let lons = (0..n).map(|_| stream.range(lon.0, lon.1)).collect();
    (lats, lons)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Exhaustive reference: smallest distance within the radius, if any.
fn brute_force(source: &PointSet, t_lat: f64, t_lon: f64, max_angle: f64) -> Option<f64> {
    source
        .iter()
        .map(|(s_lat, s_lon)| spherical_cosines(t_lat, t_lon, s_lat, s_lon))
        .filter(|&d| d <= max_angle)
        .min_by(|a, b| a.total_cmp(b))
}

#[test]
fn test_short_distance_match() {
    let resampler = Resampler::new().unwrap();
    let source = PointSet::from_degrees(&[0.0], &[0.0]).unwrap();
    let target = PointSet::from_degrees(&[0.0], &[0.0001]).unwrap();

    let matches = resampler.nearest_neighbor(&source, &target, 50_000.0).unwrap();
    let m = matches[0].unwrap();
    assert_eq!(m.id, 0);
    assert!((m.distance_m - 11.12).abs() < 0.01);
}

#[test]
fn test_unmatched_targets_encode_sentinels() {
    let resampler = Resampler::new().unwrap();
    let source = PointSet::from_degrees(&[10.0], &[10.0]).unwrap();
    let target = PointSet::from_degrees(&[-10.0, 10.0], &[-10.0, 10.5]).unwrap();

    let matches = resampler.nearest_neighbor(&source, &target, 25_000.0).unwrap();
    for m in &matches {
        assert!(m.is_none());
        assert_eq!(Match::encode(m.as_ref()), (-1, -1.0));
    }
}

#[test]
fn test_matches_agree_with_brute_force() {
    init_logging();
    let mut stream = Stream(0x9e37_79b9_7f4a_7c15);
    let radius = 50_000.0;
    let max_angle = radius / EARTH_RADIUS_METERS;

    // A high-latitude ring plus a strip across the antimeridian. The cap
    // poleward of 75° is left out: there the three-block window of the
    // narrow bands next to the pole cap can miss a neighbor that is just
    // inside the radius (see edge_cases.rs).
    let (mut s_lat, mut s_lon) = scatter(&mut stream, 3000, (40.0, 75.0), (-180.0, 179.99));
    let (lat, lon) = scatter(&mut stream, 1500, (-20.0, 20.0), (170.0, 179.99));
    s_lat.extend(lat);
    s_lon.extend(lon);
    let (lat, lon) = scatter(&mut stream, 1500, (-20.0, 20.0), (-180.0, -170.0));
    s_lat.extend(lat);
    s_lon.extend(lon);

    let (mut t_lat, mut t_lon) = scatter(&mut stream, 600, (38.0, 75.0), (-180.0, 179.99));
    let (lat, lon) = scatter(&mut stream, 600, (-21.0, 21.0), (-180.0, 179.99));
    t_lat.extend(lat);
    t_lon.extend(lon);

    let source = PointSet::from_degrees(&s_lat, &s_lon).unwrap();
    let targets = PointSet::from_degrees(&t_lat, &t_lon).unwrap();

    let resampler = Resampler::new().unwrap();
    let matches = resampler.nearest_neighbor(&source, &targets, radius).unwrap();

    let mut matched = 0;
    for (i, (lat, lon)) in targets.iter().enumerate() {
        let expected = brute_force(&source, lat, lon, max_angle);
        match (matches[i], expected) {
            (None, None) => {}
            (Some(m), Some(angle)) => {
                matched += 1;
                assert!(m.distance_m <= radius);
                assert_eq!(m.distance_m, angle * EARTH_RADIUS_METERS, "target {}", i);
                let (s_lat, s_lon) = source.get(m.id).unwrap();
                assert_eq!(spherical_cosines(lat, lon, s_lat, s_lon), angle);
            }
            (got, want) => panic!("target {}: got {:?}, brute force {:?}", i, got, want),
        }
    }
    assert!(matched > 0);
}

#[test]
fn test_identity_round_trip() {
    init_logging();
    let mut lat = Vec::new();
    let mut lon = Vec::new();
    for i in 0..60 {
        for j in 0..120 {
            lat.push(-88.5 + i as f64 * 3.0);
            lon.push(-180.0 + j as f64 * 3.0);
        }
    }
    let points = PointSet::from_degrees(&lat, &lon).unwrap();

    let resampler = Resampler::new().unwrap();
    let matches = resampler.nearest_neighbor(&points, &points, 20_000.0).unwrap();

    for (i, m) in matches.iter().enumerate() {
        let m = m.unwrap_or_else(|| panic!("point {} did not match itself", i));
        assert_eq!(m.id, i);
        assert!(m.distance_m < 1.0, "point {} at {} m", i, m.distance_m);
    }
}

#[test]
fn test_thread_count_does_not_change_results() {
    let mut stream = Stream(42);
    let (s_lat, s_lon) = scatter(&mut stream, 3000, (-89.9, 89.9), (-180.0, 179.99));
    let (t_lat, t_lon) = scatter(&mut stream, 3000, (-89.9, 89.9), (-180.0, 179.99));
    let source = PointSet::from_degrees(&s_lat, &s_lon).unwrap();
    let targets = PointSet::from_degrees(&t_lat, &t_lon).unwrap();

    let single = ResamplerBuilder::new().threads(1).build().unwrap();
    let many = ResamplerBuilder::new().threads(4).build().unwrap();
    let global = Resampler::new().unwrap();

    let a = single.nearest_neighbor(&source, &targets, 200_000.0).unwrap();
    let b = many.nearest_neighbor(&source, &targets, 200_000.0).unwrap();
    let c = global.nearest_neighbor(&source, &targets, 200_000.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn test_diagonal_summary() {
    // Twelve points one degree apart along the diagonal, resampled onto
    // themselves: every cell receives exactly its own value.
    let coords: Vec<f64> = (0..12).map(f64::from).collect();
    let values: Vec<f64> = coords.iter().map(|v| v * 10.0).collect();
    let points = PointSet::from_degrees(&coords, &coords).unwrap();

    let resampler = Resampler::new().unwrap();
    let summary = resampler
        .resample_summary(&points, &values, &points, 20_000.0)
        .unwrap();

    for (i, cell) in summary.iter().enumerate() {
        assert_eq!(cell.count, 1, "cell {}", i);
        assert_eq!(cell.mean, Some(values[i]));
        assert_eq!(cell.std_dev, Some(0.0));
    }
}

#[test]
fn test_summary_with_fill_value() {
    let resampler = Resampler::new().unwrap();
    let source = PointSet::from_degrees(&[30.0, 30.001, 29.999], &[60.0, 60.0, 60.0]).unwrap();
    let target = PointSet::from_degrees(&[30.0], &[60.0]).unwrap();

    let summary = resampler
        .resample_summary(&source, &[10.0, 20.0, NO_DATA], &target, 10_000.0)
        .unwrap();
    assert_eq!(summary[0].count, 2);
    assert_eq!(summary[0].mean, Some(15.0));
    assert_eq!(summary[0].std_dev, Some(5.0));
}

#[test]
fn test_reuse_index_for_several_target_sets() {
    let resampler = Resampler::new().unwrap();
    let source = PointSet::from_degrees(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
    let index = resampler.build_index(&source, 30_000.0).unwrap();
    assert_eq!(index.indexed_len(), 2);

    let near_first = PointSet::from_degrees(&[0.01], &[0.0]).unwrap();
    let near_second = PointSet::from_degrees(&[1.0], &[1.01]).unwrap();
    assert_eq!(
        resampler.search(&index, &near_first, 30_000.0).unwrap()[0].map(|m| m.id),
        Some(0)
    );
    assert_eq!(
        resampler.search(&index, &near_second, 30_000.0).unwrap()[0].map(|m| m.id),
        Some(1)
    );
}

#[test]
fn test_config_driven_resampler() {
    let config = Config::from_json(r#"{"threads": 2, "value_filter": "non_negative"}"#).unwrap();
    let resampler = ResamplerBuilder::new().config(config).build().unwrap();

    let source = PointSet::from_degrees(&[0.0, 0.001], &[0.0, 0.0]).unwrap();
    let target = PointSet::from_degrees(&[0.0], &[0.0]).unwrap();
    let summary = resampler
        .resample_summary(&source, &[-4.0, 4.0], &target, 10_000.0)
        .unwrap();
    assert_eq!(summary[0].count, 1);
    assert_eq!(summary[0].mean, Some(4.0));
}
