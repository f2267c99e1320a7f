#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a fresh temp file ending in `.{ext}`.
    ///
    /// The file is removed when the handle is dropped.
    pub fn create_temp_routes(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("switchyard_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_routes(content, "yaml")
    }

    pub fn create_temp_toml(content: &str) -> NamedTempFile {
        create_temp_routes(content, "toml")
    }

    pub fn create_temp_json(content: &str) -> NamedTempFile {
        create_temp_routes(content, "json")
    }
}

pub mod fixtures {
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use switchyard::{ActionOptions, Controller};

    /// Shared call log for asserting handler and listener order.
    #[derive(Clone, Default)]
    pub struct CallLog(Arc<Mutex<Vec<String>>>);

    impl CallLog {
        pub fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        pub fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    /// A `users` controller with `index` and `edit` actions that log their calls.
    pub fn users_controller(log: &CallLog) -> Controller {
        let controller = Controller::new("users");
        let index_log = log.clone();
        controller.register_action(
            "index",
            move |call| {
                index_log.push(format!("index:{}", call.args.len()));
                Ok(json!("index"))
            },
            ActionOptions::default(),
        );
        let edit_log = log.clone();
        controller.register_action(
            "edit",
            move |call| {
                edit_log.push("edit");
                Ok(Value::Array(call.args.to_vec()))
            },
            ActionOptions::default(),
        );
        controller
    }
}
