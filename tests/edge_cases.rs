use swathgrid::compute::search::NearestSearch;
use swathgrid::{BandIndex, BandLayout, Config, DistanceFormula, NO_DATA, PointSet, Resampler};

fn degrees(points: &[(f64, f64)]) -> PointSet {
    let lat: Vec<f64> = points.iter().map(|p| p.0).collect();
    let lon: Vec<f64> = points.iter().map(|p| p.1).collect();
    PointSet::from_degrees(&lat, &lon).expect("valid point set")
}

/// Test 1: Matches across the antimeridian in both directions
#[test]
fn test_antimeridian_wraparound() {
    let resampler = Resampler::new().unwrap();
    let west = degrees(&[(0.0, -179.9)]);
    let east = degrees(&[(0.0, 179.9)]);

    let a = resampler.nearest_neighbor(&west, &east, 50_000.0).unwrap();
    let b = resampler.nearest_neighbor(&east, &west, 50_000.0).unwrap();
    assert_eq!(a[0].map(|m| m.id), Some(0));
    assert_eq!(b[0].map(|m| m.id), Some(0));
    assert!((a[0].unwrap().distance_m - b[0].unwrap().distance_m).abs() < 1e-6);
}

/// Test 2: Wraparound at high latitude where blocks are wide
#[test]
fn test_antimeridian_high_latitude() {
    let resampler = Resampler::new().unwrap();
    let source = degrees(&[(70.0, 179.5)]);
    let target = degrees(&[(70.0, -179.5)]);
    let m = resampler.nearest_neighbor(&source, &target, 50_000.0).unwrap()[0].unwrap();
    assert!(m.distance_m < 40_000.0);
}

/// Test 3: Every pole-cap band has exactly one block
#[test]
fn test_pole_bands_single_block() {
    for radius in [10_000.0, 50_000.0, 500_000.0] {
        let layout = BandLayout::for_radius(radius, &Config::default()).unwrap();
        let index = BandIndex::build(&PointSet::default(), &layout).unwrap();
        let last = index.band_count() - 1;
        assert_eq!(index.band(0).unwrap().block_count(), 1);
        assert_eq!(index.band(last).unwrap().block_count(), 1);
    }
}

/// Test 4: Points in the polar cap match regardless of longitude
#[test]
fn test_across_north_pole() {
    let resampler = Resampler::new().unwrap();
    let source = degrees(&[(89.8, 10.0), (89.6, 100.0)]);
    let target = degrees(&[(89.8, -170.0)]);

    let m = resampler.nearest_neighbor(&source, &target, 50_000.0).unwrap()[0].unwrap();
    assert_eq!(m.id, 0);
    // 0.2° + 0.2° through the pole
    assert!((m.distance_m - 0.4_f64.to_radians() * 6_371_009.0).abs() < 1.0);
}

/// Test 5: South pole cap behaves like the north one
#[test]
fn test_across_south_pole() {
    let resampler = Resampler::new().unwrap();
    let source = degrees(&[(-89.9, 0.0)]);
    let target = degrees(&[(-89.9, 179.0)]);
    let matches = resampler.nearest_neighbor(&source, &target, 30_000.0).unwrap();
    assert_eq!(matches[0].map(|m| m.id), Some(0));
}

/// Test 6: The narrow bands next to a pole cap only scan three blocks, so
/// a neighbor just inside the radius but more than one block away in
/// longitude is not reported.
#[test]
fn test_polar_window_limit() {
    let resampler = Resampler::new().unwrap();
    let source = degrees(&[(89.54, -56.0)]);
    let target = degrees(&[(89.806, -121.0)]);

    let layout = resampler.layout(50_000.0).unwrap();
    let index = BandIndex::build(&source, &layout).unwrap();
    let (row, block) = index.locate(source.lat()[0], source.lon()[0]).unwrap();
    assert_eq!(row, layout.band_count() - 2);
    assert_eq!(index.band(row).unwrap().block_count(), 6);
    assert_eq!(block, 2);

    // About 46.4 km apart, inside the radius, yet outside the scanned window.
    let angle = swathgrid::compute::geometry::spherical_cosines(
        target.lat()[0],
        target.lon()[0],
        source.lat()[0],
        source.lon()[0],
    );
    assert!(angle * 6_371_009.0 < 50_000.0);
    assert_eq!(resampler.search(&index, &target, 50_000.0).unwrap(), vec![None]);
}

/// Test 7: Points exactly on the radius are accepted
#[test]
fn test_radius_boundary_inclusive() {
    let source = degrees(&[(0.0, 0.0)]);
    let target = degrees(&[(0.0, 0.1)]);
    let layout = BandLayout::for_radius(20_000.0, &Config::default()).unwrap();
    let index = BandIndex::build(&source, &layout).unwrap();
    let (lat, lon) = target.get(0).unwrap();

    let within = NearestSearch::new(&index, layout.block_angle(), DistanceFormula::SphericalCosines);
    let angle = within.nearest(lat, lon).unwrap().angle;

    let exact = NearestSearch::new(&index, angle, DistanceFormula::SphericalCosines);
    assert_eq!(exact.nearest(lat, lon).map(|c| c.id), Some(0));

    let short = NearestSearch::new(&index, angle * (1.0 - 1e-9), DistanceFormula::SphericalCosines);
    assert!(short.nearest(lat, lon).is_none());
}

/// Test 8: Fill-value coordinates never enter the index and never match
#[test]
fn test_fill_value_coordinates() {
    let source = degrees(&[(NO_DATA, NO_DATA), (10.0, 10.0), (f64::NAN, 0.0)]);
    let layout = BandLayout::for_radius(20_000.0, &Config::default()).unwrap();
    let index = BandIndex::build(&source, &layout).unwrap();
    assert_eq!(index.indexed_len(), 1);
    assert_eq!(index.dropped(), 2);

    let resampler = Resampler::new().unwrap();
    let target = degrees(&[(10.0, 10.0), (NO_DATA, NO_DATA)]);
    let matches = resampler.nearest_neighbor(&source, &target, 20_000.0).unwrap();
    assert_eq!(matches[0].map(|m| m.id), Some(1));
    assert!(matches[1].is_none());
}

/// Test 9: Longitude +180° is outside every block and is dropped
#[test]
fn test_longitude_plus_180_dropped() {
    // Inside the south pole cap, whose single block spans exactly [-π, π).
    let source = PointSet::from_radians(vec![-1.57], vec![std::f64::consts::PI]).unwrap();
    let layout = BandLayout::for_radius(50_000.0, &Config::default()).unwrap();
    let index = BandIndex::build(&source, &layout).unwrap();
    assert_eq!(index.dropped(), 1);
}

/// Test 10: Empty point sets
#[test]
fn test_empty_sets() {
    let resampler = Resampler::new().unwrap();
    let empty = PointSet::default();
    let some = degrees(&[(0.0, 0.0)]);

    assert!(resampler.nearest_neighbor(&empty, &empty, 20_000.0).unwrap().is_empty());
    assert_eq!(resampler.nearest_neighbor(&empty, &some, 20_000.0).unwrap(), vec![None]);
    assert!(resampler.nearest_neighbor(&some, &empty, 20_000.0).unwrap().is_empty());

    let summary = resampler.resample_summary(&empty, &[], &some, 20_000.0).unwrap();
    assert_eq!(summary.len(), 1);
    assert!(summary[0].is_empty());
    assert_eq!(summary[0].mean_or_no_data(), NO_DATA);
}

/// Test 11: Radii larger than half the globe collapse to a single band
#[test]
fn test_huge_radius() {
    let resampler = Resampler::new().unwrap();
    let source = degrees(&[(0.0, 0.0), (45.0, 90.0)]);
    let target = degrees(&[(-60.0, -170.0)]);

    let layout = resampler.layout(25_000_000.0).unwrap();
    assert_eq!(layout.band_count(), 1);
    let m = resampler.nearest_neighbor(&source, &target, 25_000_000.0).unwrap()[0];
    assert!(m.is_some());
}

/// Test 12: Tiny radii share the minimum block size but still filter by radius
#[test]
fn test_radius_below_min_block() {
    let config = Config::default().with_min_block_size(20_000.0);
    let resampler = Resampler::with_config(config).unwrap();
    let source = degrees(&[(0.0, 0.0)]);
    let target = degrees(&[(0.0, 0.005)]); // ~556 m

    assert_eq!(resampler.layout(100.0).unwrap(), resampler.layout(20_000.0).unwrap());
    assert!(resampler.nearest_neighbor(&source, &target, 100.0).unwrap()[0].is_none());
    assert!(resampler.nearest_neighbor(&source, &target, 1_000.0).unwrap()[0].is_some());
}
