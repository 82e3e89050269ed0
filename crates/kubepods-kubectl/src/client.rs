//! kubectl client for kubepods

use std::sync::Arc;

use kubepods_types::{ContextInfo, DeleteOptions, FsEntry, PodRecord};
use tracing::{debug, warn};

use crate::runner::{CommandRunner, ProcessRunner};
use crate::KubectlError;

/// Thin wrapper that builds kubectl invocations and interprets their output
pub struct Kubectl<R = ProcessRunner> {
    runner: R,
    program: String,
    namespace: Option<String>,
}

impl Kubectl<ProcessRunner> {
    /// Create a client that spawns `program` (usually just "kubectl")
    pub fn new(program: impl Into<String>, namespace: Option<String>) -> Self {
        Self::with_runner(ProcessRunner, program, namespace)
    }
}

impl<R: CommandRunner> Kubectl<R> {
    pub fn with_runner(runner: R, program: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            namespace,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Namespace appended to pod commands, if one was configured
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Run a command and return its trimmed stdout, failing on non-zero exit
    fn run(&self, args: Vec<String>) -> Result<String, KubectlError> {
        let output = self.runner.output(&self.program, &args)?;
        if output.success() {
            Ok(output.stdout.trim().to_string())
        } else {
            let err = KubectlError::Failed {
                command: self.command_line(&args),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            };
            warn!(error = %err, "kubectl failed");
            Err(err)
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn push_namespace(&self, args: &mut Vec<String>) {
        if let Some(ns) = &self.namespace {
            args.push("--namespace".to_string());
            args.push(ns.clone());
        }
    }

    /// All contexts in the kubeconfig, with the current one marked
    pub fn contexts(&self) -> Result<Vec<ContextInfo>, KubectlError> {
        let names = self.run(args(["config", "get-contexts", "-o", "name"]))?;
        let current = self.current_context()?;

        Ok(names
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| ContextInfo::new(name.to_string(), Some(name) == current.as_deref()))
            .collect())
    }

    /// The current context, or `None` when kubectl has none set
    pub fn current_context(&self) -> Result<Option<String>, KubectlError> {
        match self.run(args(["config", "current-context"])) {
            Ok(name) if name.is_empty() => Ok(None),
            Ok(name) => Ok(Some(name)),
            Err(KubectlError::Failed { stderr, .. })
                if stderr.contains("current-context is not set") =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Switch the kubeconfig's current context, returning kubectl's message
    pub fn use_context(&self, name: &str) -> Result<String, KubectlError> {
        debug!(context = name, "switching context");
        self.run(args(["config", "use-context", name]))
    }

    /// Fetch and decode the pod list
    pub fn get_pods(&self) -> Result<Vec<PodRecord>, KubectlError> {
        let mut args = args(["get", "pods", "-o", "json"]);
        self.push_namespace(&mut args);
        let json = self.run(args)?;
        let pods = PodRecord::parse_list(&json)?;
        debug!(count = pods.len(), "fetched pods");
        Ok(pods)
    }

    /// Arguments for `kubectl delete pod`
    ///
    /// With `options.all` the target is ignored and `--all` scopes the delete.
    pub fn delete_args(
        &self,
        target: Option<&str>,
        options: &DeleteOptions,
    ) -> Result<Vec<String>, KubectlError> {
        let mut args = args(["delete", "pod"]);
        if !options.all {
            let target = target.ok_or(KubectlError::NoTarget)?;
            args.push(target.to_string());
        }
        args.extend(options.flags());
        self.push_namespace(&mut args);
        Ok(args)
    }

    /// Delete pods, returning kubectl's message
    pub fn delete_pods(
        &self,
        target: Option<&str>,
        options: &DeleteOptions,
    ) -> Result<String, KubectlError> {
        let args = self.delete_args(target, options)?;
        debug!(?args, "deleting pods");
        self.run(args)
    }

    /// Arguments for an interactive `kubectl exec`
    pub fn exec_args(&self, pod: &str, command: &[String]) -> Vec<String> {
        let mut args = args(["exec", "-it", pod]);
        self.push_namespace(&mut args);
        args.push("--".to_string());
        args.extend(command.iter().cloned());
        args
    }

    /// Run `command` inside `pod` attached to the terminal
    pub fn exec(&self, pod: &str, command: &[String]) -> Result<(), KubectlError> {
        let args = self.exec_args(pod, command);
        match self.runner.interactive(&self.program, &args)? {
            Some(0) => Ok(()),
            code => Err(KubectlError::Failed {
                command: self.command_line(&args),
                code,
                stderr: String::new(),
            }),
        }
    }

    /// List a directory inside `pod`
    pub fn list_dir(&self, pod: &str, path: &str) -> Result<Vec<FsEntry>, KubectlError> {
        let mut args = args(["exec", pod]);
        self.push_namespace(&mut args);
        args.extend(self::args(["--", "ls", "-1Ap", path]));
        let listing = self.run(args)?;
        Ok(listing.lines().filter_map(FsEntry::from_ls_line).collect())
    }
}

impl<R: CommandRunner + 'static> Kubectl<R> {
    /// Fetch pods on the blocking pool so the caller's event loop keeps running
    pub async fn fetch_pods(self: Arc<Self>) -> Result<Vec<PodRecord>, KubectlError> {
        tokio::task::spawn_blocking(move || self.get_pods())
            .await
            .map_err(|e| KubectlError::Task(e.to_string()))?
    }
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandOutput;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records every invocation and replays queued outputs
    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<Vec<String>>>,
        outputs: Mutex<VecDeque<CommandOutput>>,
        exit_code: Option<i32>,
    }

    impl RecordingRunner {
        fn replying(outputs: Vec<CommandOutput>) -> Self {
            Self {
                outputs: Mutex::new(outputs.into()),
                exit_code: Some(0),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput, KubectlError> {
            assert_eq!(program, "kubectl");
            self.calls.lock().unwrap().push(args.to_vec());
            Ok(self.outputs.lock().unwrap().pop_front().unwrap_or(ok("")))
        }

        fn interactive(&self, _program: &str, args: &[String]) -> Result<Option<i32>, KubectlError> {
            self.calls.lock().unwrap().push(args.to_vec());
            Ok(self.exit_code)
        }
    }

    fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn fail(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    fn kubectl(outputs: Vec<CommandOutput>) -> Kubectl<RecordingRunner> {
        Kubectl::with_runner(RecordingRunner::replying(outputs), "kubectl", None)
    }

    #[test]
    fn default_delete_targets_selected_pod_with_cascade() {
        let k = kubectl(vec![ok("pod \"web-1\" deleted\n")]);
        let msg = k
            .delete_pods(Some("web-1"), &DeleteOptions::default())
            .unwrap();
        assert_eq!(msg, "pod \"web-1\" deleted");
        assert_eq!(
            k.runner().calls(),
            vec![args(["delete", "pod", "web-1", "--cascade=true"])]
        );
    }

    #[test]
    fn delete_all_drops_target() {
        let k = kubectl(vec![]);
        let opts = DeleteOptions {
            all: true,
            ..Default::default()
        };
        assert_eq!(
            k.delete_args(Some("web-1"), &opts).unwrap(),
            args(["delete", "pod", "--all", "--cascade=true"])
        );
    }

    #[test]
    fn delete_without_target_or_all_is_rejected() {
        let k = kubectl(vec![]);
        let err = k.delete_pods(None, &DeleteOptions::default()).unwrap_err();
        assert!(matches!(err, KubectlError::NoTarget));
        assert!(k.runner().calls().is_empty());
    }

    #[test]
    fn namespace_is_appended_to_pod_commands() {
        let k = Kubectl::with_runner(
            RecordingRunner::replying(vec![ok(r#"{"items": []}"#)]),
            "kubectl",
            Some("prod".to_string()),
        );
        assert_eq!(k.namespace(), Some("prod"));
        k.get_pods().unwrap();
        let opts = DeleteOptions {
            force: true,
            now: true,
            ..Default::default()
        };
        assert_eq!(
            k.delete_args(Some("api"), &opts).unwrap(),
            args([
                "delete",
                "pod",
                "api",
                "--cascade=true",
                "--now",
                "--force",
                "--namespace",
                "prod"
            ])
        );
        assert_eq!(
            k.runner().calls(),
            vec![args(["get", "pods", "-o", "json", "--namespace", "prod"])]
        );
        assert_eq!(
            k.exec_args("api", &args(["/bin/sh"])),
            args(["exec", "-it", "api", "--namespace", "prod", "--", "/bin/sh"])
        );
    }

    #[test]
    fn non_zero_exit_surfaces_code_and_stderr() {
        let k = kubectl(vec![fail(1, "error: the server doesn't have a resource type \"pods\"\n")]);
        match k.get_pods().unwrap_err() {
            KubectlError::Failed {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "kubectl get pods -o json");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "error: the server doesn't have a resource type \"pods\"");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let k = kubectl(vec![ok("not json")]);
        assert!(matches!(k.get_pods(), Err(KubectlError::Decode(_))));
    }

    #[test]
    fn contexts_mark_current() {
        let k = kubectl(vec![ok("kind-dev\nprod-eu\n\n"), ok("prod-eu\n")]);
        let contexts = k.contexts().unwrap();
        assert_eq!(
            contexts,
            vec![
                ContextInfo::new("kind-dev".into(), false),
                ContextInfo::new("prod-eu".into(), true),
            ]
        );
        assert_eq!(
            k.runner().calls(),
            vec![
                args(["config", "get-contexts", "-o", "name"]),
                args(["config", "current-context"]),
            ]
        );
    }

    #[test]
    fn unset_current_context_is_none() {
        let k = kubectl(vec![fail(1, "error: current-context is not set\n")]);
        assert_eq!(k.current_context().unwrap(), None);
    }

    #[test]
    fn use_context_passes_name() {
        let k = kubectl(vec![ok("Switched to context \"prod-eu\".\n")]);
        assert_eq!(
            k.use_context("prod-eu").unwrap(),
            "Switched to context \"prod-eu\"."
        );
        assert_eq!(
            k.runner().calls(),
            vec![args(["config", "use-context", "prod-eu"])]
        );
    }

    #[test]
    fn exec_reports_non_zero_exit() {
        let runner = RecordingRunner {
            exit_code: Some(127),
            ..Default::default()
        };
        let k = Kubectl::with_runner(runner, "kubectl", None);
        let err = k.exec("web-1", &args(["bash"])).unwrap_err();
        assert_eq!(err.exit_code(), Some(127));
        assert_eq!(
            k.runner().calls(),
            vec![args(["exec", "-it", "web-1", "--", "bash"])]
        );
    }

    #[test]
    fn list_dir_parses_ls_output() {
        let k = kubectl(vec![ok("bin/\netc/\nhello.txt\n")]);
        let entries = k.list_dir("web-1", "/").unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_dir);
        assert_eq!(entries[2].name, "hello.txt");
        assert!(!entries[2].is_dir);
        assert_eq!(
            k.runner().calls(),
            vec![args(["exec", "web-1", "--", "ls", "-1Ap", "/"])]
        );
    }

    #[tokio::test]
    async fn fetch_pods_runs_in_background() {
        let json = r#"{"items": [{"metadata": {"name": "a", "namespace": "ns"}, "status": {"phase": "Running"}}]}"#;
        let k = Arc::new(kubectl(vec![ok(json)]));
        let pods = k.clone().fetch_pods().await.unwrap();
        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].name, "a");
    }
}
