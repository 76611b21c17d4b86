use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

const SPARKS: [char; 7] = ['✦', '★', '✧', '♠', '♥', '♦', '♣'];

/// Particle for the win animation
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Letters fly to a fixed target and stay there; sparks fall away
    pub is_text: bool,
    pub target_x: f64,
    pub target_y: f64,
}

impl Particle {
    fn spark<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SPARKS.choose(rng).unwrap_or(&'✦'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..4.0),
            is_text: false,
            target_x: x,
            target_y: y,
        }
    }

    fn letter<R: Rng + ?Sized>(
        from: (f64, f64),
        target: (f64, f64),
        symbol: char,
        rng: &mut R,
    ) -> Self {
        Self {
            x: from.0,
            y: from.1,
            vel_x: target.0 - from.0,
            vel_y: target.1 - from.1,
            symbol,
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(3.0..5.0),
            is_text: true,
            target_x: target.0,
            target_y: target.1,
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        if self.is_text {
            let dist_to_target =
                ((self.target_x - self.x).powi(2) + (self.target_y - self.y).powi(2)).sqrt();
            if dist_to_target > 1.0 {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_x *= 0.95;
                self.vel_y *= 0.95;
            } else {
                self.x = self.target_x;
                self.y = self.target_y;
                self.vel_x = 0.0;
                self.vel_y = 0.0;
            }
        } else {
            self.x += self.vel_x * dt;
            self.y += self.vel_y * dt;
            self.vel_y += 15.0 * dt;
        }

        self.age += dt;
        self.age < self.max_age
    }
}

/// Particle burst drawn over the board after a win
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub started_at: Instant,
    pub duration_secs: f64,
    pub is_active: bool,
    pub width: f64,
    pub height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            started_at: Instant::now(),
            duration_secs: 3.0,
            is_active: false,
            width: 80.0,
            height: 24.0,
        }
    }

    /// Spell `headline` out of particles in the middle of a `width` x `height` area
    pub fn start(&mut self, headline: &str, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.started_at = Instant::now();
        self.is_active = true;
        self.width = width as f64;
        self.height = height as f64;

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;

        let spacing = 2.0;
        let text_width = (headline.chars().count() as f64 - 1.0) * spacing;
        let left = center_x - text_width / 2.0;
        for (i, ch) in headline.chars().enumerate().filter(|(_, c)| *c != ' ') {
            let from = (
                center_x + rng.gen_range(-10.0..10.0),
                center_y + rng.gen_range(-5.0..5.0),
            );
            let target = (left + i as f64 * spacing, center_y - 2.0);
            self.particles
                .push(Particle::letter(from, target, ch, &mut rng));
        }

        for _ in 0..25 {
            let x = center_x + rng.gen_range(-15.0..15.0);
            let y = center_y + rng.gen_range(-8.0..8.0);
            self.particles.push(Particle::spark(x, y, &mut rng));
        }
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        if self.started_at.elapsed().as_secs_f64() >= self.duration_secs {
            self.stop();
            return;
        }

        let dt = 0.1;
        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            if particle.is_text {
                return alive;
            }
            let margin = 5.0;
            let off_screen =
                particle.y > height + margin || particle.x < -margin || particle.x > width + margin;
            alive && !off_screen
        });
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
