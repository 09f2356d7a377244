use super::prompts::{build_user_prompt, SYSTEM_PROMPT};
use super::SecurityReviewer;
use crate::error::Result;
use crate::models::{AnalysisReport, FileAnalysis};
use std::path::{Path, PathBuf};

/// 每次运行都会送审的文件，相对于仓库根目录
pub const FILES_TO_ANALYZE: &[&str] = &["src/commands/demo_app.rs", "infra/main.tf"];

/// 逐个读取文件并交给审查后端，汇总为一份报告
pub struct SecurityAnalyzer<R> {
    reviewer: R,
    root: PathBuf,
}

impl<R: SecurityReviewer> SecurityAnalyzer<R> {
    /// 以当前工作目录为根
    pub fn new(reviewer: R) -> Self {
        Self::with_root(reviewer, ".")
    }

    pub fn with_root(reviewer: R, root: impl AsRef<Path>) -> Self {
        Self {
            reviewer,
            root: root.as_ref().to_path_buf(),
        }
    }

    pub async fn read_file_content(&self, file_path: &str) -> Result<String> {
        log::info!("Reading file: {}", file_path);

        match tokio::fs::read_to_string(self.root.join(file_path)).await {
            Ok(content) => Ok(content),
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    log::error!("File not found at {}", file_path);
                } else {
                    log::error!("Error reading {}: {}", file_path, e);
                }
                Err(e.into())
            }
        }
    }

    /// 审查失败不会中断流程，错误以内联文本写入报告
    pub async fn get_security_analysis(&self, file_content: &str, filename: &str) -> String {
        log::info!("Starting AI analysis (Haiku) for: {}", filename);

        let user_prompt = build_user_prompt(filename, file_content);
        match self.reviewer.review(SYSTEM_PROMPT, &user_prompt).await {
            Ok(markdown) => markdown,
            Err(e) => {
                log::error!("Error calling Anthropic API: {}", e);
                format!("Error: Could not get analysis from AI. Details: {}", e)
            }
        }
    }

    pub async fn analyze_file(&self, file_path: &str) -> FileAnalysis {
        match self.read_file_content(file_path).await {
            Ok(content) => {
                FileAnalysis::Reviewed(self.get_security_analysis(&content, file_path).await)
            }
            Err(e) => {
                log::error!("Failed to analyze {}: {}", file_path, e);
                FileAnalysis::Failed(e)
            }
        }
    }

    /// 顺序处理，每个文件至多一次审查请求
    pub async fn analyze_files(&self, files: &[&str]) -> AnalysisReport {
        let mut report = AnalysisReport::new();
        for file_path in files {
            let analysis = self.analyze_file(file_path).await;
            report.push(file_path, &analysis);
        }
        report
    }

    pub async fn run(&self) -> AnalysisReport {
        self.analyze_files(FILES_TO_ANALYZE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// 记录收到的提示，按预设返回结果
    struct FakeReviewer {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeReviewer {
        fn ok() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SecurityReviewer for FakeReviewer {
        async fn review(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
            assert_eq!(system_prompt, SYSTEM_PROMPT);
            self.prompts.lock().unwrap().push(user_prompt.to_string());
            if self.fail {
                Err(Error::Api {
                    status: 529,
                    body: "overloaded".to_string(),
                })
            } else {
                Ok(format!("reviewed {} bytes", user_prompt.len()))
            }
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn reviews_each_file_once_in_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "app/a.rs", "fn a() {}");
        write(dir.path(), "infra/main.tf", "resource {}");

        let analyzer = SecurityAnalyzer::with_root(FakeReviewer::ok(), dir.path());
        let report = analyzer.analyze_files(&["app/a.rs", "infra/main.tf"]).await;

        let prompts = analyzer.reviewer.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("`app/a.rs`"));
        assert!(prompts[0].contains("```fn a() {}```"));
        assert!(prompts[1].contains("`infra/main.tf`"));

        let body = report.as_markdown();
        assert!(!report.has_errors());
        assert!(body.starts_with("## 🤖 AI Security Analysis Report (Haiku)\n\n"));
        assert!(body.contains("### Analysis for: `app/a.rs`\nreviewed "));
        assert!(body.find("`app/a.rs`").unwrap() < body.find("`infra/main.tf`").unwrap());
        assert!(body.ends_with("\n---\n"));
    }

    #[tokio::test]
    async fn missing_file_is_reported_and_skips_review() {
        let dir = tempdir().unwrap();
        write(dir.path(), "present.rs", "x");

        let analyzer = SecurityAnalyzer::with_root(FakeReviewer::ok(), dir.path());
        let report = analyzer.analyze_files(&["missing.rs", "present.rs"]).await;

        assert!(report.has_errors());
        assert_eq!(analyzer.reviewer.prompts.lock().unwrap().len(), 1);
        assert!(report.as_markdown().contains(
            "### Analysis for: `missing.rs`\n**Error:** Could not analyze this file. Details: "
        ));
        assert!(report.as_markdown().contains("### Analysis for: `present.rs`\nreviewed "));
    }

    #[tokio::test]
    async fn api_failure_is_inlined_without_marking_errors() {
        let dir = tempdir().unwrap();
        write(dir.path(), "app.rs", "x");

        let analyzer = SecurityAnalyzer::with_root(FakeReviewer::failing(), dir.path());
        let report = analyzer.analyze_files(&["app.rs"]).await;

        assert!(!report.has_errors());
        assert!(report.as_markdown().contains(
            "### Analysis for: `app.rs`\nError: Could not get analysis from AI. Details: API returned 529: overloaded\n---\n"
        ));
    }

    #[tokio::test]
    async fn read_file_content_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bin.dat"), [0xffu8, 0xfe, 0x00]).unwrap();

        let analyzer = SecurityAnalyzer::with_root(FakeReviewer::ok(), dir.path());
        assert!(analyzer.read_file_content("bin.dat").await.is_err());
    }

    #[test]
    fn default_file_list_is_fixed() {
        assert_eq!(FILES_TO_ANALYZE, &["src/commands/demo_app.rs", "infra/main.tf"]);
    }
}
