//! Thumbnail placement inside the overlay client area

use capture::{Point, Rect, Size};

/// Largest rectangle with the aspect ratio of `source`, centered in `client`
pub fn fit(source: Size, client: Size) -> Rect {
    if source.is_empty() || client.is_empty() {
        return Rect::new(0, 0, client.width, client.height);
    }

    let scale = (client.width as f64 / source.width as f64)
        .min(client.height as f64 / source.height as f64);
    let width = ((source.width as f64 * scale).round() as u32).clamp(1, client.width);
    let height = ((source.height as f64 * scale).round() as u32).clamp(1, client.height);

    Rect::new(
        ((client.width - width) / 2) as i32,
        ((client.height - height) / 2) as i32,
        width,
        height,
    )
}

/// Map a client point inside `dest` to the `source` rectangle it displays
pub fn map_to_source(point: Point, dest: Rect, source: Rect) -> Option<Point> {
    if dest.is_empty() || source.is_empty() || !dest.contains_point(point) {
        return None;
    }

    let dx = (point.x - dest.x) as i64 * source.width as i64 / dest.width as i64;
    let dy = (point.y - dest.y) as i64 * source.height as i64 / dest.height as i64;

    Some(Point::new(source.x + dx as i32, source.y + dy as i32))
}
