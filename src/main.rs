use treegrid_rs::{TreeGridError, TreeLocation, recover};

fn main() -> Result<(), TreeGridError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let lat = 53.48082746395233;
    let lon = -2.2479699500757597;

    for diameter in [4.0, 32.0, 85.0] {
        let tree = TreeLocation::builder()
            .coordinate(lat, lon)
            .trunk_diameter_cm(diameter)
            .stem(1, 2)
            .reference(lat, lon)
            .build()?;

        println!("Trunk: {} cm", diameter);
        println!("Code: {} ({})", tree.cell.display_code(), tree.precision());
        println!("Address: {}", tree.address);
        println!("Soil area: {:.3} m2", tree.footprint.area_m2);
        println!("Recovered: {}", recover(&tree.short_code, lat, lon)?);
        println!("Cell: {:?}", tree.cell.to_polygon());
    }

    Ok(())
}
