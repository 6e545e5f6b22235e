//! Property animation and delayed calls
//!
//! Every tween belongs to an actor and is addressed by a [`TweenHandle`].
//! The animator never touches actors itself: [`Animator::advance`] returns
//! the interpolated values and fired callbacks, and the game applies them.
//! A delayed call is a tween with no properties.

use super::actor::{ActorId, ActorRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenHandle(u32);

/// Easing curves (shape is cosmetic, only the endpoints matter to gameplay)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    SineInOut,
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineInOut => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Once,
    /// Reverse direction at each end, forever
    YoyoForever,
}

/// Animatable actor properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    X,
    Y,
    /// Layer position between far (0.0) and near (1.0)
    Layer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropTween {
    pub prop: Prop,
    pub from: f32,
    pub to: f32,
}

/// Callbacks carried by a tween, resolved by the game
#[derive(Debug, Clone, PartialEq)]
pub enum Callback {
    LayerSwitched,
    /// A spray bullet reached the end of its flight
    SprayBulletSpent,
    /// Last bullet of a spray volley: clean up the whole batch
    SprayBatchSpent(Vec<ActorRef>),
    WeaponExpired,
    BossPhaseElapsed,
    PatternRepeat,
}

/// Everything a tween wants applied
#[derive(Debug, Clone, Default)]
pub struct TweenSpec {
    pub props: Vec<PropTween>,
    pub duration: f32,
    pub easing: Easing,
    pub repeat: Repeat,
    pub on_complete: Option<Callback>,
    pub on_repeat: Option<Callback>,
}

impl TweenSpec {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    pub fn prop(mut self, prop: Prop, from: f32, to: f32) -> Self {
        self.props.push(PropTween { prop, from, to });
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn yoyo_forever(mut self, on_repeat: Callback) -> Self {
        self.repeat = Repeat::YoyoForever;
        self.on_repeat = Some(on_repeat);
        self
    }

    pub fn on_complete(mut self, callback: Callback) -> Self {
        self.on_complete = Some(callback);
        self
    }
}

#[derive(Debug)]
struct Tween {
    handle: TweenHandle,
    owner: ActorRef,
    spec: TweenSpec,
    elapsed: f32,
    forward: bool,
}

/// Result of advancing one tween by one step
#[derive(Debug, Clone)]
pub struct TweenFrame {
    pub handle: TweenHandle,
    pub owner: ActorRef,
    pub values: Vec<(Prop, f32)>,
    pub callbacks: Vec<Callback>,
}

#[derive(Debug, Default)]
pub struct Animator {
    next_handle: u32,
    tweens: Vec<Tween>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween; values are first applied on the next `advance`
    pub fn animate(&mut self, owner: ActorRef, spec: TweenSpec) -> TweenHandle {
        let handle = TweenHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.tweens.push(Tween {
            handle,
            owner,
            spec,
            elapsed: 0.0,
            forward: true,
        });
        handle
    }

    /// Fire `callback` after `seconds`
    pub fn delay(&mut self, owner: ActorRef, seconds: f32, callback: Callback) -> TweenHandle {
        self.animate(owner, TweenSpec::new(seconds).on_complete(callback))
    }

    pub fn cancel(&mut self, handle: TweenHandle) {
        self.tweens.retain(|t| t.handle != handle);
    }

    /// Cancel every pending tween and delayed call owned by `owner`
    pub fn kill_tweens_of(&mut self, owner: ActorId) {
        self.tweens.retain(|t| t.owner.id != owner);
    }

    pub fn is_pending(&self, handle: TweenHandle) -> bool {
        self.tweens.iter().any(|t| t.handle == handle)
    }

    pub fn pending_for(&self, owner: ActorId) -> usize {
        self.tweens.iter().filter(|t| t.owner.id == owner).count()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }

    /// Step all tweens by `dt` seconds, in creation order
    pub fn advance(&mut self, dt: f32) -> Vec<TweenFrame> {
        let mut frames = Vec::with_capacity(self.tweens.len());

        self.tweens.retain_mut(|tween| {
            tween.elapsed += dt;
            let mut callbacks = Vec::new();
            let duration = tween.spec.duration;

            let (progress, finished) = match tween.spec.repeat {
                Repeat::Once => {
                    if duration <= 0.0 || tween.elapsed >= duration {
                        (1.0, true)
                    } else {
                        (tween.elapsed / duration, false)
                    }
                }
                Repeat::YoyoForever => {
                    let duration = duration.max(f32::EPSILON);
                    while tween.elapsed >= duration {
                        tween.elapsed -= duration;
                        tween.forward = !tween.forward;
                        if let Some(cb) = &tween.spec.on_repeat {
                            callbacks.push(cb.clone());
                        }
                    }
                    let t = tween.elapsed / duration;
                    (if tween.forward { t } else { 1.0 - t }, false)
                }
            };

            let eased = tween.spec.easing.apply(progress);
            let values = tween
                .spec
                .props
                .iter()
                .map(|p| (p.prop, p.from + (p.to - p.from) * eased))
                .collect();

            if finished {
                if let Some(cb) = tween.spec.on_complete.take() {
                    callbacks.push(cb);
                }
            }

            frames.push(TweenFrame {
                handle: tween.handle,
                owner: tween.owner,
                values,
                callbacks,
            });
            !finished
        });

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(id: u32) -> ActorRef {
        ActorRef {
            id: ActorId(id),
            generation: 0,
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::SineInOut, Easing::CubicInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_once_interpolates_then_completes() {
        let mut anim = Animator::new();
        let h = anim.animate(
            owner(1),
            TweenSpec::new(1.0)
                .prop(Prop::X, 0.0, 100.0)
                .on_complete(Callback::LayerSwitched),
        );

        let frames = anim.advance(0.25);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].values, vec![(Prop::X, 25.0)]);
        assert!(frames[0].callbacks.is_empty());
        assert!(anim.is_pending(h));

        let frames = anim.advance(1.0);
        assert_eq!(frames[0].values, vec![(Prop::X, 100.0)]);
        assert_eq!(frames[0].callbacks, vec![Callback::LayerSwitched]);
        assert!(!anim.is_pending(h));
        assert!(anim.advance(1.0).is_empty());
    }

    #[test]
    fn test_delay_fires_once() {
        let mut anim = Animator::new();
        anim.delay(owner(2), 3.0, Callback::BossPhaseElapsed);
        let fired = |frames: Vec<TweenFrame>| frames.into_iter().flat_map(|f| f.callbacks).count();
        assert_eq!(fired(anim.advance(2.9)), 0);
        assert_eq!(fired(anim.advance(0.2)), 1);
        assert!(anim.is_empty());
    }

    #[test]
    fn test_yoyo_reverses_and_reports_each_repeat() {
        let mut anim = Animator::new();
        anim.animate(
            owner(3),
            TweenSpec::new(1.0)
                .prop(Prop::X, 0.0, 10.0)
                .yoyo_forever(Callback::PatternRepeat),
        );

        let f = anim.advance(1.5);
        assert_eq!(f[0].callbacks, vec![Callback::PatternRepeat]);
        assert!((f[0].values[0].1 - 5.0).abs() < 1e-4);

        let f = anim.advance(0.25);
        assert!((f[0].values[0].1 - 2.5).abs() < 1e-4);

        let f = anim.advance(2.0);
        assert_eq!(f[0].callbacks.len(), 2);
        assert_eq!(anim.len(), 1);
    }

    #[test]
    fn test_cancel_and_kill() {
        let mut anim = Animator::new();
        let a = anim.delay(owner(1), 1.0, Callback::WeaponExpired);
        anim.delay(owner(1), 2.0, Callback::BossPhaseElapsed);
        anim.delay(owner(2), 2.0, Callback::BossPhaseElapsed);

        anim.cancel(a);
        assert!(!anim.is_pending(a));
        assert_eq!(anim.pending_for(ActorId(1)), 1);

        anim.kill_tweens_of(ActorId(1));
        assert_eq!(anim.pending_for(ActorId(1)), 0);
        assert_eq!(anim.len(), 1);
    }

    #[test]
    fn test_zero_duration_completes_on_first_step() {
        let mut anim = Animator::new();
        anim.animate(
            owner(4),
            TweenSpec::new(0.0)
                .prop(Prop::Y, 3.0, 9.0)
                .on_complete(Callback::SprayBulletSpent),
        );
        let f = anim.advance(0.0);
        assert_eq!(f[0].values, vec![(Prop::Y, 9.0)]);
        assert_eq!(f[0].callbacks, vec![Callback::SprayBulletSpent]);
    }
}
