use tokio::sync::RwLock;

/// Assumed mass of one fruit in grams, shared by every request and lost on restart.
///
/// Any value is accepted. Concurrent writers race and the last write wins.
pub struct AverageWeight {
    grams: RwLock<f64>,
}

impl AverageWeight {
    pub fn new(grams: f64) -> Self {
        Self {
            grams: RwLock::new(grams),
        }
    }

    pub async fn get(&self) -> f64 {
        *self.grams.read().await
    }

    pub async fn set(&self, grams: f64) {
        *self.grams.write().await = grams;
    }
}
