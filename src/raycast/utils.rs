/// Per-axis traversal parameters for a segment starting at grid coordinate
/// `start` inside `cell`, with `seg` the segment extent along that axis.
///
/// Returns `(t_delta, t_max)`: the segment fraction between two cell
/// boundaries, and the fraction at which the first boundary is crossed.
pub(crate) fn axis_params(start: f32, seg: f32, cell: i32, step: i32) -> (f32, f32) {
    if step == 0 || seg == 0.0 {
        return (f32::INFINITY, f32::INFINITY);
    }

    let boundary = if step > 0 { cell + 1 } else { cell } as f32;
    let t_delta = (1.0 / seg).abs();
    let t_max = ((boundary - start) / seg).max(0.0);
    (t_delta, t_max)
}
