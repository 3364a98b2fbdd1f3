//! Win celebration simulators: a particle fountain and an expanding ring.
//!
//! Both simulators are pure state machines. They know nothing about the GPU;
//! the effects renderer turns their state into billboard instances each frame.
//!
//! The particle pool is a fixed arena of [`PARTICLE_CAPACITY`] slots. Dead
//! slots are recycled with a moving cursor: the search for a free slot starts
//! where the last one was found, which keeps spawning O(1) in the common case
//! and never allocates after startup.

use rand::Rng;

/// Number of particle slots in the arena. Spawns beyond this recycle the
/// slot the cursor points at.
pub const PARTICLE_CAPACITY: usize = 300;

/// Seconds a particle lives after spawning.
pub const PARTICLE_LIFETIME: f32 = 1.0;

/// Seconds one explosion ring takes to expand and fade.
pub const EXPLOSION_PERIOD: f32 = 1.2;

/// World-space radius the ring reaches at the end of a cycle.
pub const EXPLOSION_MAX_RADIUS: f32 = 2.0;

/// One slot in the particle arena.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Offset from the draw origin, in world units.
    pub offset: [f32; 3],
    /// Velocity in world units per second.
    pub velocity: [f32; 3],
    /// RGBA tint. Alpha tracks remaining life so the renderer can fade.
    pub color: [f32; 4],
    /// Seconds of life remaining. Zero or below means the slot is free.
    pub life: f32,
}

impl Particle {
    fn dead() -> Self {
        Self {
            offset: [0.0; 3],
            velocity: [0.0; 3],
            color: [0.0; 4],
            life: 0.0,
        }
    }

    fn spawn(rng: &mut impl Rng) -> Self {
        Self {
            offset: [rng.gen_range(-0.5..0.5), 0.0, rng.gen_range(-0.5..0.5)],
            velocity: [
                rng.gen_range(-0.3..0.3),
                rng.gen_range(1.0..2.0),
                rng.gen_range(-0.3..0.3),
            ],
            color: [
                rng.gen_range(0.8..1.0),
                rng.gen_range(0.4..0.8),
                rng.gen_range(0.1..0.3),
                1.0,
            ],
            life: PARTICLE_LIFETIME,
        }
    }

    /// Whether this slot currently holds a live particle.
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Fixed-capacity particle fountain.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cursor: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    /// Creates an arena of dead particles. No allocation happens after this.
    pub fn new() -> Self {
        Self {
            particles: vec![Particle::dead(); PARTICLE_CAPACITY],
            cursor: 0,
        }
    }

    /// Advances the simulation by `delta_time` seconds: spawns up to
    /// `spawn_count` particles into free slots, then ages and moves every
    /// live particle. Alpha follows remaining life so particles fade out.
    pub fn update(&mut self, delta_time: f32, spawn_count: usize) {
        let mut rng = rand::thread_rng();
        for _ in 0..spawn_count {
            let slot = self.next_slot();
            self.particles[slot] = Particle::spawn(&mut rng);
        }

        for particle in &mut self.particles {
            if !particle.is_alive() {
                continue;
            }
            particle.life -= delta_time;
            if particle.is_alive() {
                particle.offset[0] += particle.velocity[0] * delta_time;
                particle.offset[1] += particle.velocity[1] * delta_time;
                particle.offset[2] += particle.velocity[2] * delta_time;
                particle.color[3] = particle.life / PARTICLE_LIFETIME;
            }
        }
    }

    /// Finds the slot for the next spawn. Scans from the cursor to the end,
    /// then from the start to the cursor; if every slot is live the cursor's
    /// own slot is recycled, matching the age order closely enough that the
    /// oldest particles vanish first.
    fn next_slot(&mut self) -> usize {
        for i in self.cursor..self.particles.len() {
            if !self.particles[i].is_alive() {
                self.cursor = i;
                return i;
            }
        }
        for i in 0..self.cursor {
            if !self.particles[i].is_alive() {
                self.cursor = i;
                return i;
            }
        }
        let recycled = self.cursor;
        self.cursor = (self.cursor + 1) % self.particles.len();
        recycled
    }

    /// Iterates over the live particles.
    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    /// Number of live particles.
    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// Kills every particle and rewinds the cursor.
    pub fn clear(&mut self) {
        for particle in &mut self.particles {
            *particle = Particle::dead();
        }
        self.cursor = 0;
    }
}

/// Looping expanding-ring effect shown over each celebration origin.
///
/// While active the ring grows from the origin to
/// [`EXPLOSION_MAX_RADIUS`] over [`EXPLOSION_PERIOD`] seconds, fading as it
/// goes, then restarts. [`reset`](Explosion::reset) returns it to idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Explosion {
    age: f32,
    active: bool,
}

impl Explosion {
    /// Creates an idle explosion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh cycle from radius zero.
    pub fn trigger(&mut self) {
        self.active = true;
        self.age = 0.0;
    }

    /// Returns to idle. The next [`trigger`](Explosion::trigger) starts over.
    pub fn reset(&mut self) {
        self.active = false;
        self.age = 0.0;
    }

    /// Advances the cycle, wrapping at the period so the ring loops.
    pub fn update(&mut self, delta_time: f32) {
        if !self.active {
            return;
        }
        self.age += delta_time;
        while self.age >= EXPLOSION_PERIOD {
            self.age -= EXPLOSION_PERIOD;
        }
    }

    /// Whether the ring is currently showing.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fraction of the current cycle completed, in [0, 1).
    pub fn progress(&self) -> f32 {
        self.age / EXPLOSION_PERIOD
    }

    /// Current ring radius in world units.
    pub fn radius(&self) -> f32 {
        self.progress() * EXPLOSION_MAX_RADIUS
    }

    /// Current ring opacity, fading over the cycle.
    pub fn alpha(&self) -> f32 {
        1.0 - self.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that spawning more than the arena holds caps at capacity
    /// without growing the pool.
    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut system = ParticleSystem::new();
        system.update(0.0, PARTICLE_CAPACITY * 2);

        assert_eq!(system.alive_count(), PARTICLE_CAPACITY);
        assert_eq!(system.particles.len(), PARTICLE_CAPACITY);
    }

    /// Tests that particles age out after their lifetime.
    #[test]
    fn test_particles_age_out() {
        let mut system = ParticleSystem::new();
        system.update(0.0, 10);
        assert_eq!(system.alive_count(), 10);

        system.update(PARTICLE_LIFETIME * 0.6, 0);
        assert_eq!(system.alive_count(), 10, "particles die only after a full lifetime");

        system.update(PARTICLE_LIFETIME * 0.6, 0);
        assert_eq!(system.alive_count(), 0);
    }

    /// Tests that dead slots are recycled rather than appended.
    #[test]
    fn test_dead_slots_are_recycled() {
        let mut system = ParticleSystem::new();
        system.update(0.0, PARTICLE_CAPACITY);
        system.update(PARTICLE_LIFETIME * 2.0, 0);
        assert_eq!(system.alive_count(), 0);

        system.update(0.0, 5);
        assert_eq!(system.alive_count(), 5);
        assert_eq!(system.particles.len(), PARTICLE_CAPACITY);
    }

    /// Tests that alpha tracks remaining life.
    #[test]
    fn test_alpha_fades_with_age() {
        let mut system = ParticleSystem::new();
        system.update(0.0, 1);
        system.update(0.4, 0);

        let particle = system.alive().next().expect("particle should be alive");
        assert!(
            (particle.color[3] - 0.6).abs() < 1e-5,
            "alpha should equal remaining life fraction, got {}",
            particle.color[3]
        );
    }

    /// Tests that clear kills everything immediately.
    #[test]
    fn test_clear_kills_everything() {
        let mut system = ParticleSystem::new();
        system.update(0.0, 50);
        system.clear();
        assert_eq!(system.alive_count(), 0);
    }

    /// Tests that the ring loops at its period and keeps running.
    #[test]
    fn test_explosion_loops() {
        let mut explosion = Explosion::new();
        explosion.trigger();

        explosion.update(1.0);
        assert!(explosion.is_active());
        assert!((explosion.progress() - 1.0 / EXPLOSION_PERIOD).abs() < 1e-5);

        explosion.update(0.5);
        assert!(explosion.is_active(), "looping ring must stay active");
        assert!(
            (explosion.progress() - 0.3 / EXPLOSION_PERIOD).abs() < 1e-5,
            "age should wrap around the period"
        );
    }

    /// Tests that reset returns the ring to idle with zero radius.
    #[test]
    fn test_explosion_reset_goes_idle() {
        let mut explosion = Explosion::new();
        explosion.trigger();
        explosion.update(0.7);
        explosion.reset();

        assert!(!explosion.is_active());
        assert_eq!(explosion.radius(), 0.0);
    }

    /// Tests that radius and alpha move in opposite directions over a cycle.
    #[test]
    fn test_ring_grows_while_fading() {
        let mut explosion = Explosion::new();
        explosion.trigger();
        explosion.update(EXPLOSION_PERIOD * 0.5);

        assert!((explosion.radius() - EXPLOSION_MAX_RADIUS * 0.5).abs() < 1e-5);
        assert!((explosion.alpha() - 0.5).abs() < 1e-5);
    }
}
