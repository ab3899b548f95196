use rand::seq::SliceRandom;
use rand::Rng;

const SPARKS: [char; 8] = ['🐱', '🐶', '⭐', '✨', '🎉', '🌟', '🐾', '🏆'];

const PRAISE: [&str; 6] = [
    "GREAT JOB!",
    "CORRECT!",
    "WELL DONE!",
    "SUPER!",
    "YOU GOT IT!",
    "BRILLIANT!",
];

const GRAVITY: f64 = 12.0;

/// One flying symbol
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
}

impl Spark {
    fn burst<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-8.0..-2.0),
            symbol: *SPARKS.choose(rng).unwrap_or(&'⭐'),
            color_index: rng.gen_range(0..7),
        }
    }

    fn step(&mut self, dt: f64) {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
    }
}

/// Reward shown after a correct answer or at the end of a session
#[derive(Debug, Default)]
pub struct Celebration {
    pub sparks: Vec<Spark>,
    pub message: Option<&'static str>,
    remaining_ms: u64,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, width: u16, height: u16, duration_ms: u64) {
        let mut rng = rand::thread_rng();

        self.width = width as f64;
        self.height = height as f64;
        self.remaining_ms = duration_ms;
        self.message = PRAISE.choose(&mut rng).copied();

        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        self.sparks = (0..24)
            .map(|_| {
                let x = cx + rng.gen_range(-10.0..10.0);
                let y = cy + rng.gen_range(-3.0..3.0);
                Spark::burst(x, y, &mut rng)
            })
            .collect();
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    pub fn stop(&mut self) {
        self.remaining_ms = 0;
        self.sparks.clear();
        self.message = None;
    }

    /// Advances the animation by one tick
    pub fn update(&mut self, elapsed_ms: u64) {
        if !self.is_active() {
            return;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.stop();
            return;
        }

        let dt = elapsed_ms as f64 / 1000.0;
        let (width, height) = (self.width, self.height);
        self.sparks.retain_mut(|spark| {
            spark.step(dt);
            spark.x >= 0.0 && spark.x < width && spark.y < height
        });
    }
}
