//! Hand-off from the simulation to whatever draws particles.
//!
//! The kernel never renders. After each tick it hands one [`ParticleVisual`]
//! per live particle to a [`RenderSink`]. [`InstanceBuffer`] packs them into
//! a GPU-ready byte slice and [`NullSink`] drops them.

use neon_common::{ParticleId, Vec2};

use crate::particle::Particle;

/// Per-frame render snapshot of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleVisual {
    /// Particle the snapshot belongs to.
    pub id: ParticleId,
    /// World position.
    pub position: Vec2,
    /// Facing in radians.
    pub rotation: f32,
    /// Sprite scale.
    pub scale: Vec2,
    /// RGBA; alpha is already saturated for display.
    pub color: [f32; 4],
    /// False while the render-enable delay is running.
    pub visible: bool,
}

impl ParticleVisual {
    /// Snapshot of a particle's current state.
    #[must_use]
    pub fn from_particle(particle: &Particle) -> Self {
        Self {
            id: particle.id,
            position: particle.position,
            rotation: particle.rotation,
            scale: particle.scale,
            color: particle.color.with_alpha(particle.render_alpha()),
            visible: particle.is_visible(),
        }
    }
}

/// Receives particle visuals once per tick.
pub trait RenderSink {
    /// Called before the first visual of a tick.
    fn begin_frame(&mut self) {}

    /// Called for every live particle, oldest first.
    fn draw(&mut self, visual: &ParticleVisual);

    /// Called after the last visual of a tick.
    fn end_frame(&mut self) {}
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw(&mut self, _visual: &ParticleVisual) {}
}

/// GPU-friendly particle instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    /// Position (x, y).
    pub position: [f32; 2],
    /// Scale (length, thickness).
    pub scale: [f32; 2],
    /// Color with alpha.
    pub color: [f32; 4],
    /// Rotation in radians.
    pub rotation: f32,
    /// Padding to 16-byte alignment.
    pub _padding: [f32; 3],
}

impl ParticleInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create from a particle visual.
    #[must_use]
    pub fn from_visual(visual: &ParticleVisual) -> Self {
        Self {
            position: visual.position.to_array(),
            scale: visual.scale.to_array(),
            color: visual.color,
            rotation: visual.rotation,
            _padding: [0.0; 3],
        }
    }
}

/// Collects visible particles into an instance array, rebuilt every frame.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    instances: Vec<ParticleInstance>,
}

impl InstanceBuffer {
    /// Creates a buffer with room for `capacity` instances.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    /// Instances of the last frame.
    #[must_use]
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Number of instances of the last frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the last frame drew nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance data as bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl RenderSink for InstanceBuffer {
    fn begin_frame(&mut self) {
        self.instances.clear();
    }

    fn draw(&mut self, visual: &ParticleVisual) {
        if visual.visible {
            self.instances.push(ParticleInstance::from_visual(visual));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::SpawnConfig;
    use neon_common::Rgb;

    fn particle(render_delay: u32) -> Particle {
        let mut particle = Particle::default();
        particle.respawn(
            ParticleId::FIRST,
            Vec2::new(3.0, -1.0),
            Rgb::new(1.0, 0.5, 0.0),
            10.0,
            Vec2::new(2.0, 1.0),
            SpawnConfig::default(),
            render_delay,
        );
        particle
    }

    #[test]
    fn test_instance_size() {
        assert_eq!(ParticleInstance::SIZE, 48);
    }

    #[test]
    fn test_visual_saturates_alpha() {
        let mut source = particle(0);
        source.alpha = 0.002;
        let visual = ParticleVisual::from_particle(&source);

        assert_eq!(visual.id, ParticleId::FIRST);
        assert!((visual.color[3] - 0.51).abs() < 1e-5);
        assert_eq!(&visual.color[..3], &[1.0, 0.5, 0.0]);
        assert!(visual.visible);
    }

    #[test]
    fn test_instance_buffer_skips_hidden() {
        let mut buffer = InstanceBuffer::with_capacity(4);
        buffer.begin_frame();
        buffer.draw(&ParticleVisual::from_particle(&particle(1)));
        buffer.draw(&ParticleVisual::from_particle(&particle(0)));
        buffer.end_frame();

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.instances()[0].position, [3.0, -1.0]);
        assert_eq!(buffer.as_bytes().len(), ParticleInstance::SIZE);
    }

    #[test]
    fn test_instance_buffer_clears_each_frame() {
        let mut buffer = InstanceBuffer::default();
        let visual = ParticleVisual::from_particle(&particle(0));

        buffer.begin_frame();
        buffer.draw(&visual);
        buffer.draw(&visual);
        buffer.begin_frame();
        buffer.draw(&visual);

        assert_eq!(buffer.len(), 1);
    }
}
