use armview_common::BoxDimensions;
use armview_common::config::ProjectionConfig;
use glam::{Mat4, Vec3};

/// Place the unit cube for a base-centered box: lift by half the height so the
/// bottom face sits on the link origin, then scale to the box extent.
pub fn box_local_transform(model: Mat4, dims: BoxDimensions) -> Mat4 {
    model
        * Mat4::from_translation(Vec3::new(0.0, dims.height / 2.0, 0.0))
        * Mat4::from_scale(dims.as_vec3())
}

pub fn box_model_view(view: Mat4, model: Mat4, dims: BoxDimensions) -> Mat4 {
    view * box_local_transform(model, dims)
}

/// Projection for a surface with the given aspect ratio (width / height).
///
/// Orthographic volumes are fixed and ignore the aspect ratio.
pub fn projection_matrix(config: &ProjectionConfig, aspect: f32) -> Mat4 {
    match *config {
        ProjectionConfig::Orthographic {
            half_width,
            half_height,
            near,
            far,
        } => Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far),
        ProjectionConfig::Perspective {
            fov_degrees,
            near,
            far,
        } => Mat4::perspective_rh(fov_degrees.to_radians(), aspect.max(f32::EPSILON), near, far),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_bottom_lands_on_link_origin() {
        let dims = BoxDimensions::new(2.0, 4.0, 6.0);
        let local = box_local_transform(Mat4::IDENTITY, dims);
        let bottom = local.transform_point3(Vec3::new(0.0, -0.5, 0.0));
        let top_corner = local.transform_point3(Vec3::new(0.5, 0.5, 0.5));
        assert!(bottom.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(top_corner.abs_diff_eq(Vec3::new(1.0, 4.0, 3.0), 1e-6));
    }

    #[test]
    fn model_view_composes_view_last() {
        let dims = BoxDimensions::cube(1.0);
        let model = Mat4::from_rotation_y(0.5);
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));
        let mv = box_model_view(view, model, dims);
        let expected = view * model * Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0));
        assert!(mv.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn orthographic_maps_view_volume_corners() {
        let proj = projection_matrix(&ProjectionConfig::default(), 1.0);
        let corner = proj.project_point3(Vec3::new(10.0, 8.0, -0.1));
        assert!(corner.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
        let far = proj.project_point3(Vec3::new(-10.0, -8.0, -100.0));
        assert!(far.abs_diff_eq(Vec3::new(-1.0, -1.0, 1.0), 1e-5));
    }

    #[test]
    fn perspective_uses_aspect() {
        let config = ProjectionConfig::Perspective {
            fov_degrees: 90.0,
            near: 1.0,
            far: 10.0,
        };
        let wide = projection_matrix(&config, 2.0);
        let square = projection_matrix(&config, 1.0);
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
    }
}
