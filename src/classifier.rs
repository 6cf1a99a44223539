//! Heuristic container detection from a process's command line and, when the
//! host exposes one, its control-group path.
//!
//! This is a substring heuristic, not a runtime query: a containerised process
//! whose command line and cgroup mention none of the keywords is missed, and an
//! unrelated process that happens to mention one is included.

pub const DEFAULT_CMDLINE_KEYWORDS: [&str; 4] = ["docker", "container", "runc", "busybox"];
pub const DEFAULT_GROUP_KEYWORDS: [&str; 3] = ["docker", "kubepods", "container"];

/// Which signal classified a process as a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal<'a> {
    CommandLine(&'a str),
    ControlGroup(&'a str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerClassifier {
    cmdline_keywords: Vec<String>,
    group_keywords: Vec<String>,
}

impl Default for ContainerClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_CMDLINE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_GROUP_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl ContainerClassifier {
    /// Empty keywords would match every process and are dropped.
    pub fn new(cmdline_keywords: Vec<String>, group_keywords: Vec<String>) -> Self {
        Self {
            cmdline_keywords: cmdline_keywords
                .into_iter()
                .filter(|k| !k.is_empty())
                .collect(),
            group_keywords: group_keywords
                .into_iter()
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_container(&self, cmdline: &str, group_label: Option<&str>) -> bool {
        self.matched_signal(cmdline, group_label).is_some()
    }

    /// The command line is checked first, then the control group.
    pub fn matched_signal(&self, cmdline: &str, group_label: Option<&str>) -> Option<Signal<'_>> {
        if let Some(keyword) = first_match(&self.cmdline_keywords, cmdline) {
            return Some(Signal::CommandLine(keyword));
        }
        let label = group_label?;
        first_match(&self.group_keywords, label).map(Signal::ControlGroup)
    }
}

/// The id a containerd shim was started for, taken from its ` -id <id>`
/// argument. Anything that is not a shim command line yields `None`.
pub fn container_id_from_cmdline(cmdline: &str) -> Option<&str> {
    const ID_FLAG: &str = " -id ";

    let start = cmdline.find(ID_FLAG)? + ID_FLAG.len();
    let rest = &cmdline[start..];
    let id = rest.split(' ').next().unwrap_or(rest);
    (!id.is_empty()).then_some(id)
}

fn first_match<'k>(keywords: &'k [String], haystack: &str) -> Option<&'k str> {
    keywords
        .iter()
        .find(|k| haystack.contains(k.as_str()))
        .map(String::as_str)
}
