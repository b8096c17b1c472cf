//! Polyglot catalog and per-engine fingerprint table.
//!
//! A polyglot is a payload crafted to pass through most non-templated
//! parsers unchanged while provoking a distinguishable reaction from
//! specific template engines. For every known engine the table records the
//! expected response class per polyglot; the scanner prunes the candidate
//! set by comparing observed responses against these entries.
//!
//! The table is authored data. Entries are not computed and must not be
//! "fixed" to make a scan converge; they encode measured engine behavior.

use once_cell::sync::Lazy;
use std::collections::HashMap;

// Universal error-triggering polyglots
pub const ERR1: &str = "<%'${{/#{@}}%>{{";
pub const ERR2: &str = "<%'${{#{@}}%>";
pub const ERR3: &str = "${{<%[%'\"}}%\\";
pub const ERR4: &str = "<#set($x<%={{={@{#{${xux}}%>)";
pub const ERR5: &str = "<%={{={@{#{${xu}}%>";

// Per-language error-triggering polyglots
pub const ERR_PYTHON: &str = "${{/#}}";
pub const ERR_RUBY: &str = "<%{{#{%>}";
pub const ERR_DOTNET: &str = "{{@";
pub const ERR_JAVA: &str = "<%'#{@}";
pub const ERR_JAVA2: &str = "<th:t=\"${xu}#foreach.";
pub const ERR_PHP: &str = "{{/}}";
pub const ERR_JAVASCRIPT: &str = "<%${{#{%>}}";
pub const ERR_GOLANG: &str = "{{";
pub const ERR_ELIXIR: &str = "<%";

// Universal non-error polyglots
pub const NONERR1: &str = "p \">[[${{1}}]]";
pub const NONERR2: &str = "<%=1%>@*#{1}";
pub const NONERR3: &str = "{##}/*{{.}}*/";

// Per-language non-error polyglots
pub const NONERR_PYTHON: &str = "{#${{1}}#}}";
pub const NONERR_RUBY: &str = "<%=1%>#{2}{{a}}";
pub const NONERR_DOTNET: &str = "{{1}}@*";
pub const NONERR_JAVA: &str = "a\">##[[${1}]]";
pub const NONERR_PHP: &str = "{{7}}}";
pub const NONERR_JAVASCRIPT: &str = "//*<!--{##<%=1%>{{!--{{1}}--}}-->*/#}";
pub const NONERR_GOLANG: &str = "{{.}}";
pub const NONERR_ELIXIR: &str = "<%%a%>";

// Identification-only non-error polyglots
pub const NONERR_IDENT1: &str = "{{1in[1]}}";
pub const NONERR_IDENT2: &str = "${\"<%-1-%>\"}";
pub const NONERR_IDENT3: &str = "#evaluate(\"a\")";

/// Every catalog polyglot, in the fixed order phases iterate them
pub const ALL_POLYGLOTS: &[&str] = &[
    ERR1,
    ERR2,
    ERR3,
    ERR4,
    ERR5,
    ERR_PYTHON,
    ERR_RUBY,
    ERR_DOTNET,
    ERR_JAVA,
    ERR_JAVA2,
    ERR_PHP,
    ERR_JAVASCRIPT,
    ERR_GOLANG,
    ERR_ELIXIR,
    NONERR1,
    NONERR2,
    NONERR3,
    NONERR_PYTHON,
    NONERR_RUBY,
    NONERR_DOTNET,
    NONERR_JAVA,
    NONERR_PHP,
    NONERR_JAVASCRIPT,
    NONERR_GOLANG,
    NONERR_ELIXIR,
    NONERR_IDENT1,
    NONERR_IDENT2,
    NONERR_IDENT3,
];

/// Non-error polyglots sent during the detection phase, in order
pub const DETECTION_POLYGLOTS: &[&str] = &[NONERR1, NONERR2, NONERR3];

/// Wildcard token inside expected literals; `ARBITRARY` matches any text,
/// `ARBITRARYnARBITRARY` matches exactly n word characters
pub const ARBITRARY: &str = "ARBITRARY";

/// What an engine is expected to make of a polyglot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// The engine throws a parse or runtime error
    Error,
    /// The engine renders the polyglot as the empty string
    Empty,
    /// The polyglot passes through unchanged
    Unmodified,
    /// The engine renders this concrete fragment (may contain ARBITRARY)
    Literal(&'static str),
}

use Expected::{Empty, Error, Literal, Unmodified};

/// A template engine fingerprint: expected response class per polyglot
pub struct Engine {
    pub name: &'static str,
    pub language: &'static str,
    expectations: HashMap<&'static str, Expected>,
}

impl Engine {
    fn new(
        name: &'static str,
        language: &'static str,
        entries: &[(&'static str, Expected)],
    ) -> Self {
        Self {
            name,
            language,
            expectations: entries.iter().copied().collect(),
        }
    }

    /// Expected response class for a catalog polyglot
    pub fn expected(&self, polyglot: &str) -> Option<Expected> {
        self.expectations.get(polyglot).copied()
    }
}

/// The process-wide fingerprint table, immutable after initialization
pub static ENGINES: Lazy<Vec<Engine>> = Lazy::new(|| {
    vec![
        /* Ruby */
        Engine::new("Erb/Erubi/Erubis", "Ruby", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Unmodified), (NONERR2, Literal("1@*#{1}")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("1#{2}{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Literal("//*<!--{##1{{!--{{1}}--}}-->*/#}")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Literal("<%a%>")), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Literal("${\"\"}")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Haml", "Ruby", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Unmodified), (NONERR2, Literal("<%=1%>@*1")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("<%=1%>2{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Literal("<!-- /*<!--{##<%=1%>{{!--{{1}}--}}-->*/#} -->")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Error),
        ]),
        Engine::new("Liquid", "Ruby", &[
            (ERR1, Error), (ERR2, Literal("<%'$%>")), (ERR3, Literal("$%\\")), (ERR4, Literal("<#set($x<%=%>)")), (ERR5, Literal("<%=%>")), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Empty), (ERR_PYTHON, Literal("$")), (ERR_JAVASCRIPT, Literal("<%$")), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/**/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>--}}-->*/#}")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Empty), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Slim", "Ruby", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Unmodified), (NONERR2, Literal("<%=1%>@*1")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("<%=1%>2{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Unmodified), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Mustache", "Ruby", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Literal("<#set($x<%=%>)")), (ERR5, Literal("<%=%>")), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/*#&lt;Mustache:0xARBITRARY16ARBITRARY&gt;*/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("}")), (NONERR_PYTHON, Literal("{#$#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>--}}-->*/#}")), (NONERR_GOLANG, Literal("#&lt;Mustache:0xARBITRARY16ARBITRARY&gt;")), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        /* Golang */
        Engine::new("html/template", "Golang", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Literal("&lt;%'#{@}")), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Literal("&lt;%")),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Literal("&lt;%=1%>@*#{1}")), (NONERR3, Literal("{##}/*ARBITRARY*/")),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Literal("ARBITRARY")), (NONERR_ELIXIR, Literal("&lt;%%a%>")), (NONERR_IDENT1, Error), (NONERR_IDENT2, Literal("${\"&lt;%-1-%>\"}")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("text/template", "Golang", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/*ARBITRARY*/")),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Literal("ARBITRARY")), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        /* Dotnet */
        Engine::new("RazorEngine.NetCore", "Dotnet", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Error), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Unmodified), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Unmodified), (NONERR2, Literal("<%=1%>")), (NONERR3, Unmodified),
            (NONERR_RUBY, Unmodified), (NONERR_DOTNET, Literal("{{1}}")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Unmodified), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("DotLiquid", "Dotnet", &[
            (ERR1, Error), (ERR2, Literal("<%'$%>")), (ERR3, Error), (ERR4, Literal("<#set($x<%=%>)")), (ERR5, Literal("<%=%>")), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Empty), (ERR_PYTHON, Literal("$")), (ERR_JAVASCRIPT, Literal("<%$")), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/**/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>-}}-->*/#}")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Empty), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Scriban", "Dotnet", &[
            (ERR1, Error), (ERR2, Literal("<%'$%>")), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Literal("<%")), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Literal("<%$")), (ERR_GOLANG, Empty), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Scriban (Liquid mode)", "Dotnet", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Empty), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Fluid", "Dotnet", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Empty), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        /* Elixir */
        Engine::new("EEx", "Elixir", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Error),
            (NONERR1, Unmodified), (NONERR2, Literal("1@*#{1}")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("1#{2}{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Literal("//*<!--{##1{{!--{{1}}--}}-->*/#}")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Literal("<%a%>")), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Error), (NONERR_IDENT3, Unmodified),
        ]),
        /* Java */
        Engine::new("Groovy", "Java", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Error),
            (NONERR1, Literal("p \">[[1]]")), (NONERR2, Literal("1@*#{1}")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("1#{2}{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">##[[1]]")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Literal("{#1#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##1{{!--{{1}}--}}-->*/#}")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Error), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Literal("<%-1-%>")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Freemarker", "Java", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Error), (NONERR2, Literal("<%=1%>@*1")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("<%=1%>2{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">##[[1]]")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Unmodified), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Literal("<%-1-%>")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Velocity", "Java", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Unmodified), (ERR_JAVA2, Error),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Unmodified), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Unmodified), (NONERR2, Unmodified), (NONERR3, Literal("{")),
            (NONERR_RUBY, Unmodified), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Literal("//*<!--{")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Literal("a")),
        ]),
        Engine::new("Thymeleaf", "Java", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Unmodified), (ERR5, Unmodified), (ERR_JAVA2, Error),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Unmodified), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">1")), (NONERR2, Unmodified), (NONERR3, Unmodified),
            (NONERR_RUBY, Unmodified), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">##1")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Unmodified), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Thymeleaf (Inline)", "Java", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Error), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Error),
            (NONERR1, Literal("p")), (NONERR2, Error), (NONERR3, Error),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Error), (NONERR_JAVA, Literal("a")), (NONERR_PHP, Error), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Error), (NONERR_IDENT1, Error), (NONERR_IDENT2, Error), (NONERR_IDENT3, Error),
        ]),
        /* PHP */
        Engine::new("Blade", "PHP", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Twig", "PHP", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("}")), (NONERR_JAVASCRIPT, Literal("//*<!--")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Literal("1")), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Twig (Sandbox)", "PHP", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("}")), (NONERR_JAVASCRIPT, Literal("//*<!--")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Mustache.PHP", "PHP", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/**/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("}")), (NONERR_PYTHON, Literal("{#$#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>--}}-->*/#}")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Empty), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Smarty/Smarty (Security)", "PHP", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Error), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Literal("<%=1%>@*#1")), (NONERR3, Error),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Literal("a\">##[[$1]]")), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Literal("$<%-1-%>")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Latte/Latte (Sandbox)", "PHP", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Error), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[${1}]]")), (NONERR2, Literal("<%=1%>@*#1")), (NONERR3, Error),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("{1}@*")), (NONERR_JAVA, Literal("a\">##[[$1]]")), (NONERR_PHP, Literal("{7}}")), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Literal("{1}")), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        /* Python */
        Engine::new("Jinja2/Jinja2 (Sandbox)", "Python", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("}")), (NONERR_JAVASCRIPT, Literal("//*<!--")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Literal("True")), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Tornado", "Python", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("}")), (NONERR_JAVASCRIPT, Literal("//*<!--")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Literal("True")), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Mako", "Python", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Error),
            (NONERR1, Literal("p \">[[{1}]]")), (NONERR2, Error), (NONERR3, Unmodified),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">##[[1]]")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Literal("{#{1}#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Error), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Literal("<%-1-%>")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Django", "Python", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Error), (NONERR2, Unmodified), (NONERR3, Literal("/**/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Error), (NONERR_JAVA, Unmodified), (NONERR_PHP, Error), (NONERR_PYTHON, Literal("}")), (NONERR_JAVASCRIPT, Literal("//*<!--")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("SimpleTemplateEngine", "Python", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Literal("True")), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Pystache", "Python", &[
            (ERR1, Error), (ERR2, Literal("%>")), (ERR3, Literal("$%\\")), (ERR4, Literal("<#set($x<%=%>)")), (ERR5, Literal("<%=%>")), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Empty), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Literal("")), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/**/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("}")), (NONERR_PYTHON, Literal("{#$#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>--}}-->*/#}")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Empty), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Cheetah3", "Python", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Error),
            (NONERR1, Literal("p \">[[{1}]]")), (NONERR2, Literal("1@*#{1}")), (NONERR3, Literal("{")),
            (NONERR_RUBY, Literal("1#{2}{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Literal("{#{1}#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Error), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Literal("<%-1-%>")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Chameleon", "Python", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Unmodified), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[{1}]]")), (NONERR2, Unmodified), (NONERR3, Unmodified),
            (NONERR_RUBY, Unmodified), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">##[[1]]")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Literal("{#{1}#}}")), (NONERR_JAVASCRIPT, Error), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        /* Javascript */
        Engine::new("Handlebars", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/**/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Error), (NONERR_PYTHON, Literal("{#$#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>-->*/#}")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("EJS", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Error),
            (NONERR1, Unmodified), (NONERR2, Literal("1@*#{1}")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("1#{2}{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Literal("//*<!--{##1{{!--{{1}}--}}-->*/#}")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Literal("<%a%>")), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Literal("${\"1\"}")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Underscore", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Unmodified), (NONERR2, Literal("1@*#{1}")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("1#{2}{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Literal("//*<!--{##1{{!--{{1}}--}}-->*/#}")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Error), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Error), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("VueJS", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Error),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p &quot;&gt;[[$1]]")), (NONERR2, Literal("&lt;%=1%&gt;@*#{1}")), (NONERR3, Error),
            (NONERR_RUBY, Literal("&lt;%=1%&gt;#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Literal("a&quot;&gt;##[[${1}]]")), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Literal("<!--[-->//*<!--{##<%=1%>{{!--{{1}}--}}-->*/#}<!--]-->")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Literal("&lt;%%a%&gt;")), (NONERR_IDENT1, Error), (NONERR_IDENT2, Literal("${&quot;&lt;%-1-%&gt;&quot;}")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("MustacheJS", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Error), (NONERR2, Unmodified), (NONERR3, Literal("{##}/**/")),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Error), (NONERR_JAVA, Unmodified), (NONERR_PHP, Error), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>--}}-->*/#}")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Pug", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Error), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Error),
            (NONERR1, Literal("<p>\">[[${{1}}]]</p>")), (NONERR2, Literal("<%=1%>@*1")), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>2{{a}}")), (NONERR_DOTNET, Error), (NONERR_JAVA, Error), (NONERR_PHP, Error), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Literal("<!--*<!--{##<%=1%>{{!--{{1}}--}}-->*/#}-->")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Error), (NONERR_IDENT3, Literal("<div id=\"evaluate\" a=\"a\"></div>")),
        ]),
        Engine::new("Pug (Inline)", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Unmodified), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Unmodified), (NONERR2, Literal("<%=1%>@*1")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("<%=1%>2{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Error), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Unmodified), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("AngularJS", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Literal("<th:t=\\\"${xu}#foreach.< p=\"\"></th:t=\\\"${xu}#foreach.<>")),
            (ERR_RUBY, Literal("&lt;%{{#{%&gt;}")), (ERR_DOTNET, Unmodified), (ERR_JAVA, Literal("&lt;%'#{@}")), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Literal("&lt;%")),
            (NONERR1, Literal("class=\"ng-binding\">p \"&gt;[[$1]]")), (NONERR2, Literal("&lt;%=1%&gt;@*#{1}")), (NONERR3, Error),
            (NONERR_RUBY, Literal("class=\"ng-binding\">&lt;%=1%&gt;#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Literal("a\"&gt;##[[${1}]]")), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("{#$1#}}")), (NONERR_JAVASCRIPT, Unmodified), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Literal("&lt;%%a%&gt;")), (NONERR_IDENT1, Error), (NONERR_IDENT2, Literal("${\"&lt;%-1-%&gt;\"}")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("HoganJS", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Literal("<#set($x<%=ARBITRARY<#set($x<%={{={@{#{${xux}}%>)")), (ERR5, Literal("<%=ARBITRARY<%={{={@{#{${xu}}%>")), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Literal("<%{%>}")), (ERR_DOTNET, Literal("@")), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Empty), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$]]")), (NONERR2, Unmodified), (NONERR3, Literal("{##}/**/")),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("}")), (NONERR_PYTHON, Literal("{#$#}}")), (NONERR_JAVASCRIPT, Literal("//*<!--{##<%=1%>--}}-->*/#}")), (NONERR_GOLANG, Empty), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Empty), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Nunjucks", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("}")), (NONERR_JAVASCRIPT, Literal("//*<!--")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Empty), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("Dot", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Error), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Error), (NONERR2, Unmodified), (NONERR3, Literal("{##}")),
            (NONERR_RUBY, Error), (NONERR_DOTNET, Error), (NONERR_JAVA, Unmodified), (NONERR_PHP, Error), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Literal("/#}")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("VelocityJS", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Unmodified), (ERR_JAVA2, Error),
            (ERR_RUBY, Unmodified), (ERR_DOTNET, Unmodified), (ERR_JAVA, Unmodified), (ERR_PHP, Unmodified), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Unmodified),
            (NONERR1, Error), (NONERR2, Unmodified), (NONERR3, Literal("{")),
            (NONERR_RUBY, Unmodified), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Literal("a\">")), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Error), (NONERR_JAVASCRIPT, Literal("//*<!--{")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Error), (NONERR_IDENT3, Empty),
        ]),
        Engine::new("Eta", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Unmodified), (ERR_JAVA, Error), (ERR_PHP, Unmodified), (ERR_PYTHON, Unmodified), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Unmodified), (ERR_ELIXIR, Error),
            (NONERR1, Unmodified), (NONERR2, Literal("1@*#{1}")), (NONERR3, Unmodified),
            (NONERR_RUBY, Literal("1#{2}{{a}}")), (NONERR_DOTNET, Unmodified), (NONERR_JAVA, Unmodified), (NONERR_PHP, Unmodified), (NONERR_PYTHON, Unmodified), (NONERR_JAVASCRIPT, Literal("//*<!--{##1{{!--{{1}}--}}-->*/#}")), (NONERR_GOLANG, Unmodified), (NONERR_ELIXIR, Error), (NONERR_IDENT1, Unmodified), (NONERR_IDENT2, Literal("${\"\"}")), (NONERR_IDENT3, Unmodified),
        ]),
        Engine::new("TwigJS", "Javascript", &[
            (ERR1, Error), (ERR2, Error), (ERR3, Error), (ERR4, Error), (ERR5, Error), (ERR_JAVA2, Unmodified),
            (ERR_RUBY, Error), (ERR_DOTNET, Error), (ERR_JAVA, Unmodified), (ERR_PHP, Literal("NaN")), (ERR_PYTHON, Error), (ERR_JAVASCRIPT, Error), (ERR_GOLANG, Error), (ERR_ELIXIR, Unmodified),
            (NONERR1, Literal("p \">[[$1]]")), (NONERR2, Unmodified), (NONERR3, Error),
            (NONERR_RUBY, Literal("<%=1%>#{2}")), (NONERR_DOTNET, Literal("1@*")), (NONERR_JAVA, Unmodified), (NONERR_PHP, Literal("7}")), (NONERR_PYTHON, Literal("}")), (NONERR_JAVASCRIPT, Literal("//*<!--")), (NONERR_GOLANG, Error), (NONERR_ELIXIR, Unmodified), (NONERR_IDENT1, Error), (NONERR_IDENT2, Unmodified), (NONERR_IDENT3, Unmodified),
        ]),
    ]
});

/// Looks up an engine by name
pub fn engine_by_name(name: &str) -> Option<&'static Engine> {
    ENGINES.iter().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_engine_covers_every_polyglot() {
        for engine in ENGINES.iter() {
            for polyglot in ALL_POLYGLOTS {
                assert!(
                    engine.expected(polyglot).is_some(),
                    "{} has no entry for {polyglot}",
                    engine.name
                );
            }
            assert_eq!(engine.expectations.len(), ALL_POLYGLOTS.len(), "{}", engine.name);
        }
    }

    #[test]
    fn engine_names_are_unique() {
        let mut names: Vec<_> = ENGINES.iter().map(|e| e.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn known_fingerprint_entries() {
        let erb = engine_by_name("Erb/Erubi/Erubis").unwrap();
        assert_eq!(erb.expected(NONERR2), Some(Expected::Literal("1@*#{1}")));
        assert_eq!(erb.expected(ERR1), Some(Expected::Error));

        let go_html = engine_by_name("html/template").unwrap();
        assert_eq!(
            go_html.expected(NONERR3),
            Some(Expected::Literal("{##}/*ARBITRARY*/"))
        );
        assert_eq!(go_html.expected(NONERR1), Some(Expected::Literal("p \">[[$1]]")));

        let liquid = engine_by_name("Liquid").unwrap();
        assert_eq!(liquid.expected(ERR_PHP), Some(Expected::Empty));
    }

    #[test]
    fn detection_polyglots_are_in_the_catalog() {
        for polyglot in DETECTION_POLYGLOTS {
            assert!(ALL_POLYGLOTS.contains(polyglot));
        }
    }

    #[test]
    fn all_languages_are_represented() {
        for language in ["Ruby", "Golang", "Dotnet", "Elixir", "Java", "PHP", "Python", "Javascript"] {
            assert!(ENGINES.iter().any(|e| e.language == language), "{language}");
        }
    }
}
