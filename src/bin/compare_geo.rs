use geo::{GeodesicDestination, GeodesicDistance, Point};
use vincenty_fwd::{destination, GeodeticPoint, PolarOffset, SolveOptions};

fn main() -> anyhow::Result<()> {
    // St. Louis, MO
    let start = GeodeticPoint::new(38.649, -90.305);
    let offset = PolarOffset::new(5000.0, -30.0);

    let (vincenty, back_azimuth) = destination(start, offset, &SolveOptions::default())?;
    println!(
        "Vincenty: lat={}, lon={}, back azimuth={}",
        vincenty.lat, vincenty.lon, back_azimuth
    );

    let origin: Point = start.into();
    let karney = origin.geodesic_destination(offset.azimuth_deg, offset.distance_km * 1000.0);
    println!("Karney:   lat={}, lon={}", karney.y(), karney.x());

    let vincenty: Point = vincenty.into();
    let gap_m = karney.geodesic_distance(&vincenty);
    println!("Separation = {gap_m} m");

    Ok(())
}
