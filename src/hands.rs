use embedded_graphics::geometry::Point;

const DEG_PER_MINUTE: f64 = 360.0 / 60.0;
const DEG_PER_HOUR: f64 = 360.0 / 12.0;

/// Tip of the minute or second hand for a value in `0..60`, on the circle of
/// radius `hand_length` centered in a `width` by `height` surface.
pub fn minute_second_coord(value: u32, hand_length: u32, width: u32, height: u32) -> Point {
    dial_point(f64::from(value) * DEG_PER_MINUTE, hand_length, width, height)
}

/// Tip of the hour hand. The minute value keeps the hand moving between hour
/// marks instead of jumping on the hour.
pub fn hour_coord(hour: u32, minute: u32, hand_length: u32, width: u32, height: u32) -> Point {
    let angle =
        f64::from(hour % 12) * DEG_PER_HOUR + f64::from(minute) * (DEG_PER_HOUR / 60.0);
    dial_point(angle, hand_length, width, height)
}

// 0 degrees at 12 o'clock, increasing clockwise.
fn dial_point(angle_deg: f64, hand_length: u32, width: u32, height: u32) -> Point {
    let angle = angle_deg.to_radians();
    let x = f64::from(width) * 0.5 + f64::from(hand_length) * angle.sin();
    let y = f64::from(height) * 0.5 - f64::from(hand_length) * angle.cos();
    Point::new(x.round() as i32, y.round() as i32)
}
