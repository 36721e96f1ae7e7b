//! Mapping between page pixels and world space.
//!
//! A banner is laid out as a rectangle in page pixels. The camera looks down
//! `-z` at the `z = 0` plane from `distance` units away, so a pixel covers a
//! fixed number of world units on that plane.

use bevy::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Distance from the camera to the `z = 0` plane.
    pub distance: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        PerspectiveCamera {
            fov_y: std::f32::consts::FRAC_PI_4,
            distance: 10.0,
        }
    }
}

/// Rectangle in page pixels, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Where a rectangle ends up on the `z = 0` plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPlacement {
    /// Centre of the rectangle, relative to the centre of the view.
    pub offset: Vec2,
    pub size: Vec2,
}

pub fn world_units_per_pixel(viewport: Viewport, camera: PerspectiveCamera) -> f32 {
    if viewport.height <= 0.0 {
        return 0.0;
    }
    let visible_height = 2.0 * camera.distance * (camera.fov_y / 2.0).tan();
    visible_height / viewport.height
}

pub fn project_rect(
    rect: PixelRect,
    viewport: Viewport,
    camera: PerspectiveCamera,
) -> WorldPlacement {
    let scale = world_units_per_pixel(viewport, camera);

    let center_x = rect.left + rect.width / 2.0 - viewport.width / 2.0;
    let center_y = rect.top + rect.height / 2.0 - viewport.height / 2.0;

    WorldPlacement {
        // Page y grows downwards, world y upwards
        offset: Vec2::new(center_x, -center_y) * scale,
        size: Vec2::new(rect.width, rect.height) * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        // tan(45°) = 1, so the view is 2 * distance units tall
        PerspectiveCamera {
            fov_y: std::f32::consts::FRAC_PI_2,
            distance: 5.0,
        }
    }

    #[test]
    fn full_height_maps_to_visible_height() {
        let viewport = Viewport {
            width: 1000.0,
            height: 500.0,
        };
        assert!((world_units_per_pixel(viewport, camera()) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn centred_rect_has_no_offset() {
        let viewport = Viewport {
            width: 1000.0,
            height: 500.0,
        };
        let rect = PixelRect {
            left: 400.0,
            top: 200.0,
            width: 200.0,
            height: 100.0,
        };

        let placement = project_rect(rect, viewport, camera());

        assert!(placement.offset.length() < 1e-6);
        assert!((placement.size - Vec2::new(4.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn top_left_rect_lands_up_and_left() {
        let viewport = Viewport {
            width: 1000.0,
            height: 500.0,
        };
        let rect = PixelRect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        };

        let placement = project_rect(rect, viewport, camera());

        assert!((placement.offset - Vec2::new(-9.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn collapsed_viewport_projects_to_nothing() {
        let viewport = Viewport {
            width: 0.0,
            height: 0.0,
        };
        assert_eq!(world_units_per_pixel(viewport, camera()), 0.0);
    }
}
