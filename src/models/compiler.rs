use regex::Regex;
use std::sync::OnceLock;

/// 判题站支持的编译器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Compiler {
    CppClang,
    CppGcc,
    CGcc,
    C,
    Java,
    Python2,
    Python3,
    PyPy2,
    PyPy3,
    CSharp,
    Php,
    JavaScriptV8,
    JavaScriptNode,
    R,
    Go,
    Ruby,
    Rust,
    Swift,
    ObjC,
    Pascal,
    Matlab,
    Bash,
    Scala,
    Kotlin,
    Groovy,
    TypeScript,
}

impl Compiler {
    pub const ALL: [Compiler; 26] = [
        Compiler::CppClang,
        Compiler::CppGcc,
        Compiler::CGcc,
        Compiler::C,
        Compiler::Java,
        Compiler::Python2,
        Compiler::Python3,
        Compiler::PyPy2,
        Compiler::PyPy3,
        Compiler::CSharp,
        Compiler::Php,
        Compiler::JavaScriptV8,
        Compiler::JavaScriptNode,
        Compiler::R,
        Compiler::Go,
        Compiler::Ruby,
        Compiler::Rust,
        Compiler::Swift,
        Compiler::ObjC,
        Compiler::Pascal,
        Compiler::Matlab,
        Compiler::Bash,
        Compiler::Scala,
        Compiler::Kotlin,
        Compiler::Groovy,
        Compiler::TypeScript,
    ];

    /// 提交表单中的 `language` 字段
    pub fn id(self) -> &'static str {
        match self {
            Compiler::CppClang => "2",
            Compiler::CppGcc => "38",
            Compiler::CGcc => "39",
            Compiler::C => "1",
            Compiler::Java => "4",
            Compiler::Python2 => "5",
            Compiler::Python3 => "11",
            Compiler::PyPy2 => "24",
            Compiler::PyPy3 => "25",
            Compiler::CSharp => "9",
            Compiler::Php => "8",
            Compiler::JavaScriptV8 => "14",
            Compiler::JavaScriptNode => "13",
            Compiler::R => "16",
            Compiler::Go => "17",
            Compiler::Ruby => "19",
            Compiler::Rust => "27",
            Compiler::Swift => "20",
            Compiler::ObjC => "10",
            Compiler::Pascal => "3",
            Compiler::Matlab => "21",
            Compiler::Bash => "23",
            Compiler::Scala => "28",
            Compiler::Kotlin => "29",
            Compiler::Groovy => "30",
            Compiler::TypeScript => "31",
        }
    }

    /// 提交表单中的 `languageName` 字段，也用于代码头部标记
    pub fn name(self) -> &'static str {
        match self {
            Compiler::CppClang => "C++（clang++18）",
            Compiler::CppGcc => "C++(g++ 13)",
            Compiler::CGcc => "C(gcc 10)",
            Compiler::C => "C",
            Compiler::Java => "Java",
            Compiler::Python2 => "Python2",
            Compiler::Python3 => "Python3",
            Compiler::PyPy2 => "pypy2",
            Compiler::PyPy3 => "pypy3",
            Compiler::CSharp => "C#",
            Compiler::Php => "PHP",
            Compiler::JavaScriptV8 => "JavaScript V8",
            Compiler::JavaScriptNode => "JavaScript Node",
            Compiler::R => "R",
            Compiler::Go => "Go",
            Compiler::Ruby => "Ruby",
            Compiler::Rust => "Rust",
            Compiler::Swift => "Swift",
            Compiler::ObjC => "ObjC",
            Compiler::Pascal => "Pascal",
            Compiler::Matlab => "matlab",
            Compiler::Bash => "bash",
            Compiler::Scala => "Scala",
            Compiler::Kotlin => "Kotlin",
            Compiler::Groovy => "Groovy",
            Compiler::TypeScript => "TypeScript",
        }
    }

    /// 源文件扩展名
    pub fn ext(self) -> &'static str {
        match self {
            Compiler::CppClang | Compiler::CppGcc => "cpp",
            Compiler::CGcc | Compiler::C => "c",
            Compiler::Java => "java",
            Compiler::Python2 | Compiler::Python3 | Compiler::PyPy2 | Compiler::PyPy3 => "py",
            Compiler::CSharp => "cs",
            Compiler::Php => "php",
            Compiler::JavaScriptV8 | Compiler::JavaScriptNode => "js",
            Compiler::R => "r",
            Compiler::Go => "go",
            Compiler::Ruby => "rb",
            Compiler::Rust => "rs",
            Compiler::Swift => "swift",
            Compiler::ObjC => "m",
            Compiler::Pascal => "pas",
            Compiler::Matlab => "m",
            Compiler::Bash => "sh",
            Compiler::Scala => "scala",
            Compiler::Kotlin => "kt",
            Compiler::Groovy => "groovy",
            Compiler::TypeScript => "ts",
        }
    }

    /// 行注释符号
    pub fn comment_token(self) -> &'static str {
        match self {
            Compiler::Python2
            | Compiler::Python3
            | Compiler::PyPy2
            | Compiler::PyPy3
            | Compiler::R
            | Compiler::Ruby
            | Compiler::Bash => "#",
            Compiler::Matlab => "%",
            _ => "//",
        }
    }

    /// 写在源文件第一行的编译器标记
    pub fn header_line(self) -> String {
        format!("{} Nowcoder Compiler: {}\n", self.comment_token(), self.name())
    }

    /// 按名称查找（忽略大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// 从源文件开头的注释中识别编译器
    ///
    /// 只检查开头连续的注释行（跳过空行），遇到第一行非注释代码即停止。
    /// `ext` 不为空时只考虑与该扩展名对应的注释符号。
    pub fn detect_in_code(code: &str, ext: Option<&str>) -> Option<Self> {
        let mut tokens: Vec<&'static str> = Self::ALL
            .into_iter()
            .filter(|c| ext.map_or(true, |e| c.ext() == e))
            .map(|c| c.comment_token())
            .collect();
        tokens.sort_unstable();
        tokens.dedup();

        for line in code.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(token) = tokens.iter().find(|t| line.starts_with(**t)) else {
                break;
            };
            let rest = line[token.len()..].trim_start();
            if let Some(caps) = header_regex().captures(rest) {
                return Self::from_name(&caps[1]);
            }
        }
        None
    }
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Nowcoder Compiler: (.+)$").expect("编译器标记正则无效"))
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
