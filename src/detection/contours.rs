use crate::geometry::BoundingBox;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};

/// Bounding boxes of every outermost connected ink component
///
/// Hole borders and components nested inside a hole are ignored. The output
/// order follows the contour tracer and carries no meaning.
pub fn extract_boxes(mask: &GrayImage) -> Vec<BoundingBox> {
    let contours = find_contours::<i32>(mask);
    contours
        .iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(bounding_rect)
        .collect()
}

/// Minimal axis-aligned box enclosing the contour's points
fn bounding_rect(contour: &Contour<i32>) -> Option<BoundingBox> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if min_x < 0 || min_y < 0 {
        return None;
    }
    Some(BoundingBox::new(
        min_x as u32,
        min_y as u32,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn test_finds_separate_components() {
        let mut img = GrayImage::new(60, 60);
        fill(&mut img, 5, 5, 10, 20);
        fill(&mut img, 30, 10, 8, 8);

        let mut boxes = extract_boxes(&img);
        boxes.sort_by_key(|b| b.x);

        assert_eq!(
            boxes,
            vec![
                BoundingBox::new(5, 5, 10, 20),
                BoundingBox::new(30, 10, 8, 8),
            ]
        );
    }

    #[test]
    fn test_ignores_holes_and_nested_blobs() {
        // Ring with a dot inside its hole, like a filled-in "0"
        let mut img = GrayImage::new(50, 50);
        fill(&mut img, 5, 5, 30, 40);
        for y in 12..38 {
            for x in 12..28 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        fill(&mut img, 18, 22, 4, 4);

        let boxes = extract_boxes(&img);

        assert_eq!(boxes, vec![BoundingBox::new(5, 5, 30, 40)]);
    }

    #[test]
    fn test_single_pixel_component() {
        let mut img = GrayImage::new(10, 10);
        img.put_pixel(9, 9, Luma([255]));
        assert_eq!(extract_boxes(&img), vec![BoundingBox::new(9, 9, 1, 1)]);
    }

    #[test]
    fn test_empty_mask_has_no_boxes() {
        let img = GrayImage::new(32, 32);
        assert!(extract_boxes(&img).is_empty());
    }
}
