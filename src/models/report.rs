use crate::error::Error;

pub const REPORT_TITLE: &str = "## 🤖 AI Security Analysis Report (Haiku)\n\n";
pub const REPORT_INTRO: &str = "I have analyzed the new code and found the following:\n\n";
const SECTION_END: &str = "\n---\n";

/// 单个文件的分析结果
#[derive(Debug)]
pub enum FileAnalysis {
    /// 模型返回的 Markdown（调用失败时为内联错误文本）
    Reviewed(String),
    /// 文件本身无法读取
    Failed(Error),
}

/// 一次运行中逐个文件累积的 Markdown 报告
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    body: String,
    has_errors: bool,
}

impl AnalysisReport {
    pub fn new() -> Self {
        let mut body = String::with_capacity(REPORT_TITLE.len() + REPORT_INTRO.len());
        body.push_str(REPORT_TITLE);
        body.push_str(REPORT_INTRO);
        Self {
            body,
            has_errors: false,
        }
    }

    pub fn push(&mut self, file_path: &str, analysis: &FileAnalysis) {
        self.body
            .push_str(&format!("### Analysis for: `{}`\n", file_path));

        match analysis {
            FileAnalysis::Reviewed(markdown) => {
                self.body.push_str(markdown);
                self.body.push_str(SECTION_END);
            }
            FileAnalysis::Failed(e) => {
                self.body.push_str(&format!(
                    "**Error:** Could not analyze this file. Details: {}\n---\n",
                    e
                ));
                self.has_errors = true;
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn as_markdown(&self) -> &str {
        &self.body
    }
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self::new()
    }
}
