use std::sync::Arc;
use log::{error, info};
use tokio::task::JoinHandle;
use vibecanvas_core::{generate, GenerateError, Session, VibeModel, VibeResult};
use crate::preview::Preview;

pub struct App {
    pub should_quit: bool,
    pub session: Session,

    // The single in-flight generation, if any
    pub generation_task: Option<JoinHandle<Result<VibeResult, GenerateError>>>,

    // Decoded image for the current result
    pub preview: Option<Preview>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    model: Arc<dyn VibeModel>,
}

impl App {
    pub fn new(model: Arc<dyn VibeModel>) -> Self {
        Self {
            should_quit: false,
            session: Session::new(),
            generation_task: None,
            preview: None,
            animation_frame: 0,
            model,
        }
    }

    /// Start a generation cycle. Returns false if the session refused it.
    pub fn submit(&mut self) -> bool {
        if self.generation_task.is_some() {
            return false;
        }
        let Some(vibe) = self.session.submit() else {
            return false;
        };

        info!("Generating vibe for {:?}", vibe);
        self.preview = None;
        self.animation_frame = 0;

        let model = Arc::clone(&self.model);
        self.generation_task = Some(tokio::spawn(async move {
            generate(model.as_ref(), &vibe).await
        }));
        true
    }

    /// Settle the session once the background task has finished
    pub async fn poll_generation(&mut self) {
        let finished = self
            .generation_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }
        let Some(task) = self.generation_task.take() else {
            return;
        };

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Generation task failed to complete: {}", e);
                Err(GenerateError::Interrupted(e.to_string()))
            }
        };

        self.session.settle(outcome);
        self.preview = self.session.result().and_then(Preview::from_result);
    }

    /// "Try a different vibe"
    pub fn reset(&mut self) {
        if self.session.reset() {
            self.preview = None;
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use vibecanvas_core::{ImageError, MetadataError, VibeMetadata, ViewState, GENERIC_ERROR_MESSAGE};

    /// Stand-in for the Gemini client
    struct StubModel {
        fail_image: bool,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn new(fail_image: bool) -> Self {
            Self {
                fail_image,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VibeModel for StubModel {
        async fn generate_metadata(&self, _vibe: &str) -> Result<VibeMetadata, MetadataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(VibeMetadata {
                title: "Neon Rain".to_string(),
                description: "...".to_string(),
                palette: vec!["#1A1A40".to_string(), "#E94560".to_string()],
            })
        }

        async fn generate_image(
            &self,
            _vibe: &str,
            _metadata: &VibeMetadata,
        ) -> Result<String, ImageError> {
            if self.fail_image {
                Err(ImageError::NoImageData)
            } else {
                Ok("data:image/png;base64,AAAA".to_string())
            }
        }
    }

    async fn settle(app: &mut App) {
        for _ in 0..200 {
            app.poll_generation().await;
            if !app.session.is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("generation never settled");
    }

    #[tokio::test]
    async fn test_submit_runs_pipeline_once() {
        let model = Arc::new(StubModel::new(false));
        let mut app = App::new(model.clone());
        for c in "Midnight rain in Tokyo".chars() {
            app.session.insert_char(c);
        }

        assert!(app.submit());
        assert!(!app.submit());
        assert!(app.session.is_loading());

        settle(&mut app).await;
        assert!(app.generation_task.is_none());
        assert_eq!(app.session.result().unwrap().title, "Neon Rain");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_submit_spawns_nothing() {
        let mut app = App::new(Arc::new(StubModel::new(false)));
        app.session.insert_char(' ');
        assert!(!app.submit());
        assert!(app.generation_task.is_none());
        assert_eq!(app.session.state(), &ViewState::Idle);
    }

    #[tokio::test]
    async fn test_image_failure_shows_generic_error() {
        let mut app = App::new(Arc::new(StubModel::new(true)));
        app.session.insert_char('x');
        app.submit();
        settle(&mut app).await;

        assert_eq!(app.session.error(), Some(GENERIC_ERROR_MESSAGE));
        assert!(app.preview.is_none());
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let mut app = App::new(Arc::new(StubModel::new(false)));
        app.session.insert_char('x');
        app.submit();
        settle(&mut app).await;

        app.reset();
        assert_eq!(app.session.state(), &ViewState::Idle);
        assert!(app.preview.is_none());
        assert!(app.session.can_edit());
    }
}
