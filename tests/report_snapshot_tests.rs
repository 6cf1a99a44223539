use color_eyre::eyre::Result;
use insta::assert_snapshot;
use procsnap::report::{ReportBuilder, ReportKind};
use procsnap::system::{ProcessSample, ProcessSource, SystemMemory};

struct FixtureSource {
    memory: SystemMemory,
    samples: Vec<ProcessSample>,
}

impl ProcessSource for FixtureSource {
    fn memory(&mut self) -> SystemMemory {
        self.memory
    }

    fn samples(&mut self) -> Result<Box<dyn Iterator<Item = ProcessSample> + '_>> {
        Ok(Box::new(self.samples.iter().cloned()))
    }
}

fn mock_process(pid: u32, name: &str, args: &[&str], vsz_kb: u64, rss_kb: u64) -> ProcessSample {
    let command = if args.is_empty() {
        None
    } else {
        let mut region = Vec::new();
        for arg in args {
            region.extend_from_slice(arg.as_bytes());
            region.push(0);
        }
        Some(region)
    };
    ProcessSample {
        pid,
        name: name.to_string(),
        command,
        virtual_bytes: vsz_kb * 1024,
        resident_bytes: rss_kb * 1024,
        state: Some('S'),
        control_group: None,
    }
}

fn fixture() -> FixtureSource {
    let mut kthreadd = mock_process(2, "kthreadd", &[], 0, 0);
    kthreadd.state = None;
    let mut shim = mock_process(
        1450,
        "containerd-shim",
        &["/usr/bin/containerd-shim-runc-v2", "-namespace", "moby", "-id", "4f1c"],
        1_250_000,
        12_500,
    );
    shim.state = Some('R');
    let mut nginx = mock_process(1502, "nginx", &["nginx: worker process"], 60_000, 6_000);
    nginx.control_group = Some("/system.slice/docker-4f1c.scope".to_string());

    FixtureSource {
        memory: SystemMemory::new(1_000_000, 400_000),
        samples: vec![
            mock_process(1, "systemd", &["/sbin/init", "splash"], 170_000, 12_000),
            kthreadd,
            shim,
            nginx,
            mock_process(2210, "vim", &["/usr/bin/vim", "file.txt"], 30_000, 9_000),
        ],
    }
}

#[test]
fn system_report_pretty_json() {
    let report = ReportBuilder::default()
        .generate(&mut fixture(), ReportKind::System)
        .unwrap();
    assert_snapshot!("system_report_pretty", report.to_json(true).unwrap());
}

#[test]
fn container_report_compact_json() {
    let report = ReportBuilder::default()
        .generate(&mut fixture(), ReportKind::Containers)
        .unwrap();
    assert_snapshot!(
        report.to_json(false).unwrap(),
        @r#"{"mem_total_kb":1000000,"mem_free_kb":400000,"mem_used_kb":600000,"containers":[{"pid":1450,"name":"containerd-shim","cmdline":"/usr/bin/containerd-shim-runc-v2 -namespace moby -id 4f1c","vsz_kb":1250000,"rss_kb":12500,"mem_pct":"125.00","container_id":"4f1c"},{"pid":1502,"name":"nginx","cmdline":"nginx: worker process","vsz_kb":60000,"rss_kb":6000,"mem_pct":"6.00"}]}"#
    );
}

#[test]
fn empty_process_table_json() {
    let mut source = FixtureSource {
        memory: SystemMemory::default(),
        samples: Vec::new(),
    };
    let report = ReportBuilder::default()
        .generate(&mut source, ReportKind::Containers)
        .unwrap();
    assert_snapshot!(
        report.to_json(false).unwrap(),
        @r#"{"mem_total_kb":0,"mem_free_kb":0,"mem_used_kb":0,"containers":[]}"#
    );
}
