//! Actor state shared by every entity
//!
//! An [`Actor`] is an arena slot: a [`Body`] (position, size, layer, flags)
//! plus the variant data in [`ActorKind`]. Variant behaviour lives in
//! `behavior`; the body only knows how to move, size itself for a layer and
//! keep its hit-box current.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::ship::ActorKind;
use super::tween::TweenHandle;
use crate::consts::*;

/// Arena index of an actor (stable for the life of the game)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl ActorId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Actor id pinned to one acquisition of its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorRef {
    pub id: ActorId,
    pub generation: u32,
}

/// Depth plane; only actors on the same layer interact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layer {
    /// Layer 0, "bottom"
    Far,
    /// Layer 1, "top"
    #[default]
    Near,
}

impl Layer {
    pub fn index(self) -> u8 {
        match self {
            Layer::Far => 0,
            Layer::Near => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Layer::Far => Layer::Near,
            Layer::Near => Layer::Far,
        }
    }

    /// Animatable value: far = 0.0, near = 1.0
    pub fn value(self) -> f32 {
        self.index() as f32
    }

    /// Render scale at a (possibly fractional) layer value
    pub fn scale_at(value: f32) -> f32 {
        FAR_LAYER_SCALE + (1.0 - FAR_LAYER_SCALE) * value.clamp(0.0, 1.0)
    }

    pub fn scale(self) -> f32 {
        Self::scale_at(self.value())
    }

    pub fn speed_factor(self) -> f32 {
        match self {
            Layer::Far => FAR_LAYER_SPEED,
            Layer::Near => 1.0,
        }
    }
}

/// An in-flight layer transition
#[derive(Debug, Clone, Copy)]
pub struct LayerSwitch {
    pub to: Layer,
    /// Footprint when the switch began; the visual center is held on it
    pub start_size: Vec2,
    pub tween: TweenHandle,
}

#[derive(Debug, Clone)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Velocity in pixels per second
    pub vel: Vec2,
    /// Current (layer-scaled) size
    pub size: Vec2,
    /// Canonical near-layer size
    pub org_size: Vec2,
    /// Visual offset animated during a layer switch
    pub offset: Vec2,
    /// Settled layer (the origin layer while switching)
    pub layer: Layer,
    /// Continuous layer value for rendering
    pub layer_value: f32,
    pub switching: Option<LayerSwitch>,
    pub hit_margin: f32,
    pub hit_box: Rect,
    pub collidable: bool,
    pub pooled: bool,
    pub disposed: bool,
}

impl Body {
    pub fn new(org_size: Vec2, pooled: bool) -> Self {
        let layer = Layer::default();
        let size = org_size * layer.scale();
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            org_size,
            offset: Vec2::ZERO,
            layer,
            layer_value: layer.value(),
            switching: None,
            hit_margin: HIT_MARGIN,
            hit_box: Rect::inset(Vec2::ZERO, size, HIT_MARGIN),
            collidable: true,
            pooled,
            // Pooled slots start parked in their pool
            disposed: pooled,
        }
    }

    /// Clear per-acquisition state, keeping the stale layer so the caller
    /// can decide whether a snap is needed
    pub fn reset(&mut self, org_size: Vec2, hit_margin: f32) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.offset = Vec2::ZERO;
        self.org_size = org_size;
        self.size = org_size * self.layer.scale();
        self.layer_value = self.layer.value();
        self.switching = None;
        self.hit_margin = hit_margin;
        self.collidable = true;
        self.disposed = false;
        self.refresh_hit_box();
    }

    /// Advance position by velocity (far layer moves at reduced speed)
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * self.layer.speed_factor() * dt;
        if self.in_view() {
            self.refresh_hit_box();
        }
    }

    /// Has entered the viewport from above
    #[inline]
    pub fn in_view(&self) -> bool {
        self.pos.y > -self.size.y
    }

    pub fn refresh_hit_box(&mut self) {
        self.hit_box = Rect::inset(self.pos + self.offset, self.size, self.hit_margin);
    }

    /// Full visual bounds used by the broad phase
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.offset + self.size * 0.5
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size * 0.5 - self.offset;
    }

    pub fn is_switching(&self) -> bool {
        self.switching.is_some()
    }

    /// Jump straight to a layer with no transition
    pub fn snap_to_layer(&mut self, layer: Layer) {
        self.switching = None;
        self.offset = Vec2::ZERO;
        self.layer = layer;
        self.layer_value = layer.value();
        self.size = self.org_size * layer.scale();
        self.refresh_hit_box();
    }

    /// Apply an animated layer value, resizing around the fixed center
    pub fn apply_layer_value(&mut self, value: f32) {
        let Some(switch) = self.switching else {
            return;
        };
        self.layer_value = value;
        self.size = self.org_size * Layer::scale_at(value);
        self.offset = (switch.start_size - self.size) * 0.5;
    }

    /// Commit the offsets into the position and settle on the target layer.
    /// Returns false if no switch was in flight.
    pub fn finish_layer_switch(&mut self) -> bool {
        let Some(switch) = self.switching.take() else {
            return false;
        };
        self.size = self.org_size * switch.to.scale();
        self.offset = (switch.start_size - self.size) * 0.5;
        self.pos += self.offset;
        self.offset = Vec2::ZERO;
        self.layer = switch.to;
        self.layer_value = switch.to.value();
        self.refresh_hit_box();
        true
    }

    /// Narrow-phase test; identity is checked by the caller
    pub fn collides(&self, other: &Body) -> bool {
        if !self.collidable || !other.collidable || self.disposed || other.disposed {
            return false;
        }
        // Mid-switch actors sit between layers
        if self.is_switching() || other.is_switching() || self.layer != other.layer {
            return false;
        }
        self.hit_box.overlaps(&other.hit_box)
    }
}

/// One arena slot
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    /// Bumped on every acquisition from a pool
    pub generation: u32,
    pub body: Body,
    pub kind: ActorKind,
}

impl Actor {
    pub fn actor_ref(&self) -> ActorRef {
        ActorRef {
            id: self.id,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32, layer: Layer) -> Body {
        let mut body = Body::new(Vec2::splat(40.0), true);
        body.reset(Vec2::splat(40.0), HIT_MARGIN);
        body.snap_to_layer(layer);
        body.pos = Vec2::new(x, y);
        body.refresh_hit_box();
        body
    }

    fn fake_switch(to: Layer, start_size: Vec2) -> LayerSwitch {
        let mut anim = super::super::tween::Animator::new();
        let tween = anim.delay(
            ActorRef {
                id: ActorId(0),
                generation: 0,
            },
            1.0,
            super::super::tween::Callback::LayerSwitched,
        );
        LayerSwitch {
            to,
            start_size,
            tween,
        }
    }

    #[test]
    fn test_far_layer_moves_slower() {
        let mut near = body_at(0.0, 0.0, Layer::Near);
        let mut far = body_at(0.0, 0.0, Layer::Far);
        near.vel = Vec2::new(0.0, 100.0);
        far.vel = Vec2::new(0.0, 100.0);
        near.integrate(1.0);
        far.integrate(1.0);
        assert_eq!(near.pos.y, 100.0);
        assert_eq!(far.pos.y, 75.0);
    }

    #[test]
    fn test_far_layer_is_half_scale() {
        let far = body_at(0.0, 0.0, Layer::Far);
        assert_eq!(far.size, Vec2::splat(20.0));
        let near = body_at(0.0, 0.0, Layer::Near);
        assert_eq!(near.size, Vec2::splat(40.0));
    }

    #[test]
    fn test_hit_box_waits_until_in_view() {
        let mut body = body_at(0.0, -200.0, Layer::Near);
        let parked = body.hit_box;
        body.vel = Vec2::new(0.0, 60.0);
        body.integrate(1.0);
        assert_eq!(body.hit_box, parked);
        body.integrate(2.0);
        assert!(body.in_view());
        assert_eq!(body.hit_box, Rect::inset(body.pos, body.size, HIT_MARGIN));
    }

    #[test]
    fn test_collides_requires_same_layer_and_overlap() {
        let a = body_at(0.0, 0.0, Layer::Near);
        let b = body_at(10.0, 10.0, Layer::Near);
        assert!(a.collides(&b) && b.collides(&a));

        let c = body_at(10.0, 10.0, Layer::Far);
        assert!(!a.collides(&c) && !c.collides(&a));

        // Visual bounds overlap, inset hit-boxes don't
        let d = body_at(25.0, 0.0, Layer::Near);
        assert!(a.bounds().overlaps(&d.bounds()));
        assert!(!a.collides(&d));
    }

    #[test]
    fn test_non_collidable_never_collides() {
        let a = body_at(0.0, 0.0, Layer::Near);
        let mut b = body_at(0.0, 0.0, Layer::Near);
        b.collidable = false;
        assert!(!a.collides(&b) && !b.collides(&a));
    }

    #[test]
    fn test_layer_switch_keeps_visual_center() {
        let mut body = body_at(100.0, 100.0, Layer::Near);
        let center = body.center();
        body.switching = Some(fake_switch(Layer::Far, body.size));

        body.apply_layer_value(0.5);
        assert_eq!(body.size, Vec2::splat(30.0));
        assert!((body.center() - center).length() < 1e-4);
        // Position itself is untouched mid-switch
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));

        assert!(body.finish_layer_switch());
        assert_eq!(body.layer, Layer::Far);
        assert_eq!(body.offset, Vec2::ZERO);
        assert_eq!(body.size, Vec2::splat(20.0));
        assert!((body.center() - center).length() < 1e-4);
        assert!(!body.finish_layer_switch());
    }

    #[test]
    fn test_switching_body_is_between_layers() {
        let a = body_at(0.0, 0.0, Layer::Near);
        let mut b = body_at(0.0, 0.0, Layer::Near);
        b.switching = Some(fake_switch(Layer::Far, b.size));
        assert!(!a.collides(&b));
    }
}
