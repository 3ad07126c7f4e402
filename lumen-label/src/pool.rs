//! Sprite instances for inline icons and underline bars.
//!
//! The pool is an indexed arena: instance `i` shows icon `i` of the
//! current frame. It grows on demand and never shrinks; surplus
//! instances are deactivated and lose their sprite.

use lumen_core::{Color32, IconDescriptor, Vec2};

/// Pull form: `(atlas, sprite name) -> sprite`.
pub type SpriteGetter<S> = Box<dyn FnMut(Option<&str>, &str) -> Option<S>>;
/// Push form: assign the sprite to the instance directly.
pub type SpriteSetter<S> = Box<dyn FnMut(&mut SpriteInstance<S>, Option<&str>, &str)>;

/// How sprite names become sprites. Exactly one form is active.
pub enum SpriteResolver<S> {
    Getter(SpriteGetter<S>),
    Setter(SpriteSetter<S>),
}

impl<S> SpriteResolver<S> {
    fn resolve(&mut self, instance: &mut SpriteInstance<S>, atlas: Option<&str>, name: &str) {
        match self {
            SpriteResolver::Getter(get) => instance.sprite = get(atlas, name),
            SpriteResolver::Setter(set) => set(instance, atlas, name),
        }
    }
}

impl<S> std::fmt::Debug for SpriteResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpriteResolver::Getter(_) => f.write_str("SpriteResolver::Getter"),
            SpriteResolver::Setter(_) => f.write_str("SpriteResolver::Setter"),
        }
    }
}

/// One pooled renderable.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteInstance<S> {
    pub active: bool,
    pub sprite: Option<S>,
    pub atlas: Option<String>,
    /// Sprite names in frame order.
    pub frames: Vec<String>,
    pub frame_rate: f32,
    /// Index into `frames` of the sprite currently shown.
    pub frame: usize,
    elapsed: f32,
    pub size: Vec2,
    /// Anchored position relative to the label centre.
    pub position: Vec2,
    pub color: Color32,
}

impl<S> Default for SpriteInstance<S> {
    fn default() -> Self {
        Self {
            active: false,
            sprite: None,
            atlas: None,
            frames: Vec::new(),
            frame_rate: -1.0,
            frame: 0,
            elapsed: 0.0,
            size: Vec2::ZERO,
            position: Vec2::ZERO,
            color: Color32::WHITE,
        }
    }
}

impl<S> SpriteInstance<S> {
    pub fn is_animated(&self) -> bool {
        self.frame_rate > 0.0 && self.frames.len() > 1
    }

    pub fn current_frame(&self) -> Option<&str> {
        self.frames.get(self.frame).map(String::as_str)
    }

    fn show_frame(&mut self, frame: usize, resolver: &mut SpriteResolver<S>) {
        self.frame = frame;
        let Some(name) = self.frames.get(frame).cloned() else {
            return;
        };
        let atlas = self.atlas.clone();
        resolver.resolve(self, atlas.as_deref(), &name);
    }

    fn release(&mut self) {
        self.active = false;
        self.sprite = None;
        self.frames.clear();
        self.frame_rate = -1.0;
        self.frame = 0;
        self.elapsed = 0.0;
    }
}

#[derive(Debug)]
pub struct SpritePool<S> {
    instances: Vec<SpriteInstance<S>>,
}

impl<S> Default for SpritePool<S> {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
        }
    }
}

impl<S> SpritePool<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &[SpriteInstance<S>] {
        &self.instances
    }

    pub fn active(&self) -> impl Iterator<Item = &SpriteInstance<S>> {
        self.instances.iter().filter(|i| i.active)
    }

    /// Configure one instance per icon and deactivate the rest.
    ///
    /// Icons with zero alpha are not shown.
    pub fn reconcile(&mut self, icons: &[IconDescriptor], mut resolver: Option<&mut SpriteResolver<S>>) {
        if self.instances.len() < icons.len() {
            self.instances.resize_with(icons.len(), SpriteInstance::default);
        }

        for (icon, instance) in icons.iter().zip(self.instances.iter_mut()) {
            if icon.color.a == 0 {
                instance.release();
                continue;
            }
            instance.frames = icon.sprites.clone();
            instance.atlas = icon.atlas.clone();
            instance.frame_rate = icon.frame_rate;
            instance.elapsed = 0.0;
            instance.sprite = None;
            if icon.has_sprite() {
                match resolver.as_deref_mut() {
                    Some(resolver) => instance.show_frame(0, resolver),
                    None => log::warn!("icon {:?} has sprites but no resolver is set", icon.sprites),
                }
            } else {
                instance.frame = 0;
            }
            instance.color = icon.color;
            instance.size = icon.size;
            instance.position = icon.position;
            instance.active = true;
        }

        for instance in self.instances.iter_mut().skip(icons.len()) {
            instance.release();
        }
    }

    /// Advance frame animations by `dt` seconds.
    pub fn tick(&mut self, dt: f32, mut resolver: Option<&mut SpriteResolver<S>>) {
        for instance in self.instances.iter_mut().filter(|i| i.active && i.is_animated()) {
            instance.elapsed += dt;
            let period = 1.0 / instance.frame_rate;
            let steps = (instance.elapsed / period).floor();
            if steps < 1.0 {
                continue;
            }
            instance.elapsed -= steps * period;
            let next = (instance.frame + steps as usize) % instance.frames.len();
            match resolver.as_deref_mut() {
                Some(resolver) => instance.show_frame(next, resolver),
                None => instance.frame = next,
            }
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
