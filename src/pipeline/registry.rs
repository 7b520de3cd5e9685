//! Plugin lifecycle: installing and uninstalling plugins on the bus.

use std::rc::Rc;

use serde_json::Value;

use crate::pipeline::bus::EventBus;
use crate::pipeline::plugin::Plugin;
use crate::util::errors::PipelineError;

/// Tracks installed plugins and owns the bind/setup/register sequence.
#[derive(Default)]
pub struct PluginRegistry {
    installed: Vec<Rc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        PluginRegistry::default()
    }

    /// Install a plugin: run its setup hook with the resolved configuration
    /// blob, then register every declared handler on the bus in declaration
    /// order under the plugin's identity.
    ///
    /// At most one plugin per identity may be installed; configuration
    /// resolution already collapsed duplicates, so a second install of the
    /// same identity is a wiring bug.
    pub fn install(
        &mut self,
        bus: &EventBus,
        plugin: Rc<dyn Plugin>,
        config: &Value,
    ) -> Result<(), PipelineError> {
        if self.installed.iter().any(|p| p.id() == plugin.id()) {
            return Err(PipelineError::Handler {
                plugin: plugin.id().to_string(),
                phase: "install".to_string(),
                reason: "a plugin with this identity is already installed".to_string(),
            });
        }

        plugin.install(config)?;

        let id = plugin.id().to_string();
        for (phase, handler) in Rc::clone(&plugin).middleware() {
            bus.register(phase, id.clone(), handler);
        }

        tracing::debug!(plugin = %id, "installed");
        self.installed.push(plugin);
        Ok(())
    }

    /// Uninstall a plugin, removing exactly the handlers it registered.
    pub fn uninstall(&mut self, bus: &EventBus, id: &str) {
        bus.unregister_owner(id);
        self.installed.retain(|p| p.id() != id);
    }

    /// Installed plugin count.
    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::bus::Handler;
    use crate::pipeline::context::PluginContext;
    use crate::pipeline::phase::{Operation, Phase};
    use crate::pipeline::plugin::PluginKind;
    use std::cell::RefCell;

    struct Recorder {
        id: String,
        installed_with: RefCell<Option<Value>>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Plugin for Recorder {
        fn id(&self) -> &str {
            &self.id
        }

        fn kind(&self) -> PluginKind {
            PluginKind::Platform
        }

        fn install(&self, config: &Value) -> Result<(), PipelineError> {
            *self.installed_with.borrow_mut() = Some(config.clone());
            Ok(())
        }

        fn middleware(self: Rc<Self>) -> Vec<(Phase, Handler)> {
            let id = self.id.clone();
            let calls = Rc::clone(&self.calls);
            vec![(
                Phase::main(Operation::Build),
                Rc::new(move |_: &EventBus, _: &mut PluginContext| {
                    calls.borrow_mut().push(id.clone());
                    Ok(())
                }) as Handler,
            )]
        }
    }

    fn recorder(id: &str, calls: &Rc<RefCell<Vec<String>>>) -> Rc<Recorder> {
        Rc::new(Recorder {
            id: id.to_string(),
            installed_with: RefCell::new(None),
            calls: Rc::clone(calls),
        })
    }

    #[test]
    fn test_install_runs_setup_hook_and_registers_handlers() {
        let bus = EventBus::new();
        let mut registry = PluginRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let plugin = recorder("p", &calls);
        registry
            .install(&bus, Rc::clone(&plugin) as Rc<dyn Plugin>, &serde_json::json!({"k": 1}))
            .unwrap();

        assert_eq!(
            *plugin.installed_with.borrow(),
            Some(serde_json::json!({"k": 1}))
        );
        assert_eq!(bus.handler_count(Phase::main(Operation::Build)), 1);
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let bus = EventBus::new();
        let mut registry = PluginRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        registry
            .install(&bus, recorder("p", &calls), &Value::Null)
            .unwrap();
        let err = registry
            .install(&bus, recorder("p", &calls), &Value::Null)
            .unwrap_err();
        assert!(err.to_string().contains("already installed"));
    }

    #[test]
    fn test_uninstall_removes_only_that_plugins_handlers() {
        let bus = EventBus::new();
        let mut registry = PluginRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        registry.install(&bus, recorder("a", &calls), &Value::Null).unwrap();
        registry.install(&bus, recorder("b", &calls), &Value::Null).unwrap();
        registry.uninstall(&bus, "a");

        let mut ctx = PluginContext::new(Operation::Build);
        bus.run(Phase::main(Operation::Build), &mut ctx).unwrap();
        assert_eq!(*calls.borrow(), vec!["b"]);
        assert_eq!(registry.len(), 1);
    }
}
