use glam::{IVec2, Vec2};

/// Integer error-accumulator line walk between two screen space points.
///
/// Endpoints are truncated toward zero. The walk always steps +1 along the axis
/// of greatest extent and moves the other axis by at most one per step. Only
/// points inside `[0, bounds.x) x [0, bounds.y)` reach `plot`.
///
/// Off-screen portions are never walked: the primary axis range is clamped to the
/// buffer and the accumulator for the first visible step is computed in closed
/// form, so the emitted pixels are exactly those of the full walk.
pub fn bresenham<F>(start: Vec2, end: Vec2, bounds: IVec2, mut plot: F)
where
    F: FnMut(IVec2),
{
    // i64 so deltas of saturated far-away coordinates cannot overflow
    let mut x0 = start.x as i32 as i64;
    let mut y0 = start.y as i32 as i64;
    let mut x1 = end.x as i32 as i64;
    let mut y1 = end.y as i32 as i64;
    let (width, height) = (bounds.x as i64, bounds.y as i64);

    // Every pixel of the walk lies inside the endpoints' bounding box.
    if x0.max(x1) < 0 || x0.min(x1) >= width || y0.max(y1) < 0 || y0.min(y1) >= height {
        return;
    }

    let mut steep = false;
    if (x0 - x1).abs() < (y0 - y1).abs() {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
        steep = true;
    }

    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let (primary_len, secondary_len) = if steep { (height, width) } else { (width, height) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let derror2 = dy.abs() * 2;
    let ystep = if y1 > y0 { 1 } else { -1 };

    let first = x0.max(0);
    let last = x1.min(primary_len - 1);

    // After k steps the accumulator satisfies -dx < error2 <= dx, which pins down
    // the number of secondary steps taken so far. The product k * derror2 reaches
    // 2^66 for saturated endpoints.
    let skipped = (first - x0) as i128;
    let (mut y, mut error2) = if dx == 0 {
        (y0, 0)
    } else {
        let (dx128, derror128) = (dx as i128, derror2 as i128);
        let taken = (skipped * derror128 + dx128 - 1) / (2 * dx128);
        let error2 = skipped * derror128 - 2 * dx128 * taken;
        (y0 + ystep * taken as i64, error2 as i64)
    };

    for x in first..=last {
        if (0..secondary_len).contains(&y) {
            let pos = if steep { (y, x) } else { (x, y) };
            plot(IVec2::new(pos.0 as i32, pos.1 as i32));
        }

        error2 += derror2;
        if error2 > dx {
            y += ystep;
            error2 -= dx * 2;
        }
    }
}
