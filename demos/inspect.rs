use dsn6::Dsn6File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: inspect <map.dsn6>");
        std::process::exit(2);
    };

    let file = Dsn6File::open(&path)?;
    let header = file.header();
    let [ex, ey, ez] = header.extent();
    let [bx, by, bz] = header.brick_layout().counts();

    println!("=== {} ===", path);
    let voxels = usize::from(ex) * usize::from(ey) * usize::from(ez);
    println!("Extent: {}x{}x{} = {} voxels", ex, ey, ez, voxels);
    println!("Bricks: {}x{}x{} ({} bytes)", bx, by, bz, header.data_size());
    println!("Start: {:?}", header.start());
    println!("Sampling: {:?}", header.sampling_rate());
    let [a, b, c] = header.cell_lengths();
    let [alpha, beta, gamma] = header.cell_angles();
    println!(
        "Cell: {:.3}×{:.3}×{:.3} Å, {:.2}° {:.2}° {:.2}°",
        a, b, c, alpha, beta, gamma
    );
    println!(
        "Density: (raw - {}) / {}",
        header.density_c(),
        header.density_a()
    );

    let grid = file.read_grid()?;
    if let Some(stats) = grid.statistics() {
        println!(
            "Data range: {:.3} to {:.3} (mean: {:.3}, rms: {:.3})",
            stats.min, stats.max, stats.mean, stats.rms
        );
    }

    Ok(())
}
