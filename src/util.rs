use glam::Mat4;

/// Multi-line dump of a matrix, one column per line, for trace logs.
pub fn format_mat4(name: &str, mat: &Mat4) -> String {
    let mut output = format!("{}:\n", name);
    for (label, col) in ["x_axis", "y_axis", "z_axis", "w_axis"]
        .iter()
        .zip([mat.x_axis, mat.y_axis, mat.z_axis, mat.w_axis])
    {
        output.push_str(&format!(
            "{}: [{:8.3},{:8.3},{:8.3},{:8.3}]\n",
            label, col.x, col.y, col.z, col.w
        ));
    }
    output
}
