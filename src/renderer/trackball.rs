use crossbeam::channel::Sender;
use glam::{Mat4, Quat, Vec2, Vec3};
use log::debug;
use winit::dpi::PhysicalSize;

/// Notification that the orientation changed and the scene should be redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawRequest;

/// Virtual-sphere rotation controller.
///
/// Owns the orientation; every change is announced with one
/// [`RedrawRequest`] on the channel given at construction.
pub struct Trackball {
    initial: Quat,
    orientation: Quat,
    anchor: Option<Vec3>,
    notify: Sender<RedrawRequest>,
}

impl Trackball {
    /// `initial_angle` rotates the starting orientation about the vertical axis.
    pub fn new(initial_angle: f32, notify: Sender<RedrawRequest>) -> Self {
        let initial = Quat::from_rotation_y(initial_angle);
        Self {
            initial,
            orientation: initial,
            anchor: None,
            notify,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation)
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn begin_drag(&mut self, cursor: Vec2, size: PhysicalSize<u32>) {
        self.anchor = Some(sphere_point(cursor, size));
    }

    pub fn drag_to(&mut self, cursor: Vec2, size: PhysicalSize<u32>) {
        let Some(from) = self.anchor else { return };
        let to = sphere_point(cursor, size);

        let axis = from.cross(to);
        if axis.length_squared() < 1e-12 {
            return;
        }

        let angle = from.angle_between(to);
        let delta = Quat::from_axis_angle(axis.normalize(), angle);
        self.orientation = (delta * self.orientation).normalize();
        self.anchor = Some(to);

        debug!("trackball rotated by {angle:.4} rad");
        self.request_redraw();
    }

    pub fn end_drag(&mut self) {
        self.anchor = None;
    }

    pub fn reset(&mut self) {
        self.anchor = None;
        if self.orientation != self.initial {
            self.orientation = self.initial;
            self.request_redraw();
        }
    }

    fn request_redraw(&self) {
        let _ = self.notify.send(RedrawRequest);
    }
}

/// Projects a window position onto the unit sphere inscribed in the window.
///
/// Points outside the sphere's silhouette land on its equator.
fn sphere_point(cursor: Vec2, size: PhysicalSize<u32>) -> Vec3 {
    let width = size.width.max(1) as f32;
    let height = size.height.max(1) as f32;
    let radius = width.min(height) / 2.0;

    let x = (cursor.x - width / 2.0) / radius;
    let y = (height / 2.0 - cursor.y) / radius;
    let d2 = x * x + y * y;

    if d2 <= 1.0 {
        Vec3::new(x, y, (1.0 - d2).sqrt())
    } else {
        Vec3::new(x, y, 0.0).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::{self, Receiver};

    const SIZE: PhysicalSize<u32> = PhysicalSize::new(400, 400);

    fn trackball() -> (Trackball, Receiver<RedrawRequest>) {
        let (tx, rx) = channel::unbounded();
        (Trackball::new(0.0, tx), rx)
    }

    #[test]
    fn starts_at_identity_for_zero_angle() {
        let (ball, _rx) = trackball();
        assert!(ball.view_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn initial_angle_rotates_about_y() {
        let (tx, _rx) = channel::unbounded();
        let ball = Trackball::new(0.5, tx);
        assert!(ball.view_matrix().abs_diff_eq(Mat4::from_rotation_y(0.5), 1e-6));
    }

    #[test]
    fn horizontal_drag_rotates_about_vertical_axis() {
        let (mut ball, rx) = trackball();
        ball.begin_drag(Vec2::new(200.0, 200.0), SIZE);
        ball.drag_to(Vec2::new(300.0, 200.0), SIZE);

        let rotated = ball.view_matrix().transform_vector3(Vec3::Z);
        assert!(rotated.x > 0.1);
        assert!(rotated.y.abs() < 1e-5);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn each_change_sends_one_redraw() {
        let (mut ball, rx) = trackball();
        ball.begin_drag(Vec2::new(200.0, 200.0), SIZE);
        ball.drag_to(Vec2::new(220.0, 190.0), SIZE);
        ball.drag_to(Vec2::new(240.0, 180.0), SIZE);
        ball.drag_to(Vec2::new(240.0, 180.0), SIZE);
        ball.end_drag();

        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn motion_without_drag_is_ignored() {
        let (mut ball, rx) = trackball();
        ball.drag_to(Vec2::new(10.0, 10.0), SIZE);

        assert!(ball.view_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reset_restores_initial_orientation() {
        let (mut ball, rx) = trackball();
        ball.begin_drag(Vec2::new(200.0, 200.0), SIZE);
        ball.drag_to(Vec2::new(200.0, 100.0), SIZE);
        ball.reset();

        assert!(!ball.is_dragging());
        assert!(ball.view_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
        assert_eq!(rx.try_iter().count(), 2);

        ball.reset();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sphere_points_are_unit_length() {
        for cursor in [
            Vec2::new(200.0, 200.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(399.0, 17.0),
            Vec2::new(1000.0, -50.0),
        ] {
            assert!((sphere_point(cursor, SIZE).length() - 1.0).abs() < 1e-5);
        }
    }
}
