use aeromatch::contour::{Contour, ContourSet, Point};
use aeromatch::{extract_contours, ExtractorConfig, Pattern, Raster};

fn gray_scene(size: usize, rects: &[(usize, usize, usize, usize)]) -> Raster {
    let mut data = vec![25u8; size * size * 3];
    for &(x0, y0, w, h) in rects {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                let idx = (y * size + x) * 3;
                data[idx] = 210;
                data[idx + 1] = 210;
                data[idx + 2] = 210;
            }
        }
    }
    Raster::new(data, size, size).unwrap()
}

fn rect_contour(x0: i32, y0: i32, w: i32, h: i32) -> Contour {
    Contour::new(vec![
        Point { x: x0, y: y0 },
        Point { x: x0 + w, y: y0 },
        Point { x: x0 + w, y: y0 + h },
        Point { x: x0, y: y0 + h },
    ])
}

#[test]
fn empty_set_gives_all_zero_pattern() {
    let set = ContourSet::new(Vec::new(), 256, 256);
    let pattern = Pattern::rasterize(&set, 512);
    assert_eq!(pattern.size(), 512);
    assert!(pattern.is_blank());
    assert!(pattern.bits().iter().all(|&b| b == 0));
}

#[test]
fn drawn_centroid_sits_on_the_canvas_center() {
    // A rectangle outline is symmetric, so the drawn-pixel centroid must
    // coincide with the mapped bounding-box center within a pixel.
    let set = ContourSet::new(vec![rect_contour(40, 80, 120, 70)], 256, 256);
    for size in [128usize, 256, 512] {
        let pattern = Pattern::rasterize(&set, size);
        let (cx, cy) = pattern.drawn_centroid().unwrap();
        let target = size as f64 / 2.0;
        assert!((cx - target).abs() <= 1.0, "size {size}: centroid x {cx}");
        assert!((cy - target).abs() <= 1.0, "size {size}: centroid y {cy}");
    }
}

#[test]
fn longer_axis_fills_ninety_percent_of_the_canvas() {
    let set = ContourSet::new(vec![rect_contour(10, 10, 200, 50)], 256, 256);
    let size = 512usize;
    let pattern = Pattern::rasterize(&set, size);

    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            if pattern.get(x, y) != 0 {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
            }
        }
    }
    let span = (max_x - min_x) as f64;
    let expected = size as f64 * 0.9;
    assert!(
        (span - expected).abs() <= 4.0,
        "span {span}, expected about {expected}"
    );
}

#[test]
fn extraction_then_rasterization_is_idempotent() {
    let raster = gray_scene(256, &[(30, 30, 80, 60), (140, 130, 70, 80)]);
    let cfg = ExtractorConfig::default();

    let first = Pattern::rasterize(&extract_contours(&raster, &cfg), 512);
    let second = Pattern::rasterize(&extract_contours(&raster, &cfg), 512);
    assert_eq!(first, second);
    assert!(!first.is_blank());
}

#[test]
fn extracted_scene_pattern_is_centered() {
    let raster = gray_scene(256, &[(60, 40, 120, 90)]);
    let set = extract_contours(&raster, &ExtractorConfig::default());
    assert!(!set.is_empty());

    let pattern = Pattern::rasterize(&set, 512);
    let (cx, cy) = pattern.drawn_centroid().unwrap();
    assert!((cx - 256.0).abs() <= 1.0, "centroid x {cx}");
    assert!((cy - 256.0).abs() <= 1.0, "centroid y {cy}");
}
