use image::GrayImage;
use rebar_takeoff::collaborators::LineDetector;
use rebar_takeoff::segments::Segment;
use rebar_takeoff::{analyze_beam, TakeoffParams};

/// Demo stub: fabricates the line detections of a small beam region and runs
/// the takeoff pipeline end to end.
struct CannedDetector;

impl LineDetector for CannedDetector {
    fn detect_lines(&self, raster: &GrayImage) -> Vec<Segment> {
        if raster.width() >= 400 {
            // Unmasked beam image: the two long outline edges.
            vec![
                Segment::from_coords(20.0, 60.0, 620.0, 60.0),
                Segment::from_coords(20.0, 260.0, 620.0, 260.0),
            ]
        } else {
            // Color-isolated mask: a hooked top bar and a plain bottom bar.
            vec![
                Segment::from_coords(40.0, 90.0, 300.0, 90.0),
                Segment::from_coords(40.0, 90.0, 40.0, 130.0),
                Segment::from_coords(60.0, 230.0, 280.0, 230.0),
            ]
        }
    }
}

fn main() {
    env_logger::init();

    let full_image = GrayImage::new(640, 320);
    let mask = GrayImage::new(320, 320);

    match analyze_beam(&CannedDetector, &mask, &full_image, &TakeoffParams::default()) {
        Ok(analysis) => {
            println!(
                "lines_found={} center_y={:.1}",
                analysis.lines_found, analysis.center_y
            );
            for (i, bar) in analysis.bars.iter().enumerate() {
                println!(
                    "bar {}: {:?} total {:.1}px (run {:.1} + hooks {:.1})",
                    i + 1,
                    bar.class,
                    bar.total_length,
                    bar.horizontal_length,
                    bar.hook_length
                );
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
