//! Runtime system trait and the runner that ticks systems in order

use crate::clock::GameClock;
use crate::context::FrameContext;
use keystorm_core::Result;

/// A system that can be ticked by the frame loop
///
/// Systems are updated in registration order, once per frame, on the main thread.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, ctx: &mut FrameContext) -> Result<()>;

    /// Called once per frame
    fn update(&mut self, ctx: &mut FrameContext, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}

/// Owns a frame context, a clock and an ordered list of systems.
pub struct SystemRunner {
    pub context: FrameContext,
    pub clock: GameClock,
    systems: Vec<Box<dyn RuntimeSystem>>,
}

impl SystemRunner {
    pub fn new(context: FrameContext) -> Self {
        Self {
            context,
            clock: GameClock::new(),
            systems: Vec::new(),
        }
    }

    /// Register and initialize a system
    pub fn add_system(&mut self, mut system: Box<dyn RuntimeSystem>) -> Result<()> {
        system.initialize(&mut self.context)?;
        log::debug!("registered system '{}'", system.name());
        self.systems.push(system);
        Ok(())
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Tick using the wall clock
    pub fn frame(&mut self) -> Result<()> {
        let dt = self.clock.tick();
        self.run_systems(dt)
    }

    /// Tick by an explicit delta (seconds)
    pub fn step(&mut self, dt: f64) -> Result<()> {
        let dt = self.clock.advance(dt);
        self.run_systems(dt)
    }

    fn run_systems(&mut self, dt: f64) -> Result<()> {
        self.context.time = self.clock.total_time;
        for system in &mut self.systems {
            system.update(&mut self.context, dt)?;
        }
        Ok(())
    }

    /// Shut down every system in reverse registration order
    pub fn shutdown(&mut self) -> Result<()> {
        while let Some(mut system) = self.systems.pop() {
            system.shutdown()?;
            log::debug!("shut down system '{}'", system.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl RuntimeSystem for Recorder {
        fn initialize(&mut self, _ctx: &mut FrameContext) -> Result<()> {
            self.log.borrow_mut().push(format!("init {}", self.name));
            Ok(())
        }

        fn update(&mut self, ctx: &mut FrameContext, dt: f64) -> Result<()> {
            ctx.camera.position.x += dt as f32;
            self.log.borrow_mut().push(format!("update {}", self.name));
            Ok(())
        }

        fn shutdown(&mut self) -> Result<()> {
            self.log.borrow_mut().push(format!("shutdown {}", self.name));
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn systems_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = SystemRunner::new(FrameContext::default());
        for name in ["a", "b"] {
            runner
                .add_system(Box::new(Recorder {
                    name: name.into(),
                    log: log.clone(),
                }))
                .unwrap();
        }
        let start_x = runner.context.camera.position.x;
        runner.step(0.1).unwrap();
        runner.shutdown().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "init a",
                "init b",
                "update a",
                "update b",
                "shutdown b",
                "shutdown a"
            ]
        );
        assert!((runner.context.camera.position.x - start_x - 0.2).abs() < 1e-6);
        assert!((runner.context.time - 0.1).abs() < 1e-9);
        assert_eq!(runner.system_count(), 0);
    }
}
