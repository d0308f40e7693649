//! Built-in word lists for comment spell-checking

/// Common English words
pub const ENGLISH_WORDS: &[&str] = &[
    "a", "able", "about", "above", "accept", "access", "according", "account", "across", "action",
    "actual", "actually", "add", "added", "adding", "additional", "address", "after", "again",
    "against", "all", "allow", "allowed", "allows", "almost", "along", "already", "also",
    "although", "always", "among", "amount", "an", "and", "another", "answer", "any", "anything",
    "appear", "apply", "are", "area", "argument", "around", "as", "ask", "assume", "at",
    "attempt", "available", "avoid", "away", "back", "bad", "base", "based", "basic", "be",
    "because", "become", "been", "before", "begin", "behavior", "behaviour", "being", "below",
    "best", "better", "between", "big", "both", "bottom", "break", "bring", "broken", "build",
    "built", "but", "by", "call", "called", "calling", "came", "can", "cannot", "case", "cases",
    "cause", "change", "changed", "changes", "character", "check", "checked", "child", "choose",
    "clean", "clear", "close", "code", "come", "comment", "common", "compare", "complete",
    "condition", "consider", "contain", "contains", "content", "context", "continue", "control",
    "convert", "copy", "correct", "could", "count", "create", "created", "creates", "current",
    "currently", "custom", "data", "date", "day", "decide", "default", "define", "defined",
    "delete", "depend", "describe", "description", "detail", "details", "did", "different",
    "directly", "directory", "disable", "display", "do", "does", "doing", "done", "down",
    "during", "each", "early", "easy", "edit", "either", "element", "else", "empty", "enable",
    "end", "enough", "ensure", "entire", "entry", "equal", "error", "even", "event", "every",
    "everything", "exact", "example", "except", "exist", "existing", "exists", "expect",
    "expected", "explicit", "extra", "fail", "failed", "failure", "false", "far", "fast",
    "feature", "few", "field", "file", "files", "fill", "final", "find", "first", "fix", "fixed",
    "follow", "following", "for", "force", "form", "format", "found", "free", "from", "full",
    "function", "further", "future", "general", "get", "getting", "give", "given", "global",
    "go", "good", "great", "group", "handle", "handler", "happen", "hard", "has", "have",
    "having", "he", "height", "hello", "help", "her", "here", "hidden", "high", "him", "his",
    "hold", "how", "however", "idea", "if", "ignore", "immediately", "important", "in",
    "include", "including", "index", "information", "initial", "input", "inside", "instance",
    "instead", "into", "is", "issue", "it", "item", "its", "itself", "just", "keep", "key",
    "kind", "know", "known", "large", "last", "later", "least", "left", "length", "less", "let",
    "level", "life", "like", "limit", "line", "lines", "list", "load", "local", "long", "look",
    "loop", "lower", "made", "main", "make", "makes", "making", "manually", "many", "match",
    "may", "maybe", "mean", "means", "message", "method", "might", "missing", "mode", "more",
    "most", "move", "much", "multiple", "must", "name", "need", "needed", "needs", "never",
    "new", "next", "no", "node", "none", "normal", "not", "note", "nothing", "now", "null",
    "number", "object", "occur", "occurred", "of", "off", "often", "old", "on", "once", "one",
    "only", "open", "option", "optional", "options", "or", "order", "other", "otherwise", "our",
    "out", "output", "outside", "over", "override", "own", "page", "parameter", "parent", "part",
    "pass", "passed", "path", "pattern", "people", "per", "perform", "person", "place", "please",
    "point", "position", "possible", "prevent", "previous", "print", "probably", "problem",
    "process", "property", "provide", "provided", "public", "put", "query", "quite", "range",
    "rather", "read", "ready", "real", "really", "reason", "receive", "record", "reference",
    "remove", "replace", "request", "require", "required", "reset", "response", "result",
    "results", "return", "returns", "right", "run", "running", "safe", "said", "same", "save",
    "second", "section", "see", "seem", "select", "send", "separate", "set", "setting",
    "settings", "several", "she", "should", "show", "side", "similar", "simple", "since",
    "single", "size", "skip", "small", "so", "some", "something", "sometimes", "sort", "sound",
    "source", "space", "special", "specific", "specified", "start", "state", "still", "stop",
    "store", "string", "structure", "successful", "such", "support", "supported", "sure",
    "system", "table", "take", "target", "task", "temporary", "test", "text", "than", "that",
    "the", "their", "them", "then", "there", "therefore", "these", "they", "thing", "think",
    "this", "those", "though", "three", "through", "time", "to", "today", "together", "too",
    "top", "total", "true", "try", "turn", "two", "type", "under", "unless", "until", "up",
    "update", "upon", "us", "use", "used", "useful", "user", "uses", "using", "usually", "valid",
    "value", "values", "variable", "version", "very", "via", "view", "want", "was", "water",
    "way", "we", "well", "went", "were", "what", "when", "where", "whether", "which", "while",
    "who", "whole", "why", "width", "will", "with", "within", "without", "word", "work",
    "working", "works", "world", "would", "write", "written", "wrong", "year", "years", "yet",
    "you", "your", "yourself", "zero",
];

/// Programming vocabulary and abbreviations that aren't English words
pub const PROGRAMMING_WORDS: &[&str] = &[
    "admin", "api", "app", "arg", "args", "array", "ascii", "async", "auth", "await", "axios",
    "backend", "bool", "boolean", "btn", "buffer", "byte", "bytes", "cache", "callback", "cfg",
    "char", "cli", "cmd", "config", "const", "cors", "crud", "css", "csv", "ctx", "db", "debug",
    "deprecated", "dest", "dev", "dict", "dom", "enum", "env", "eslint", "err", "fetch",
    "frontend", "func", "getter", "git", "github", "html", "http", "https", "idx", "impl",
    "init", "int", "iterator", "js", "json", "jsx", "jwt", "lib", "lint", "linter", "localhost",
    "lodash", "len", "max", "metadata", "middleware", "min", "mock", "mut", "namespace", "npm",
    "num", "oauth", "obj", "param", "params", "parse", "parser", "pkg", "plugin", "prod",
    "prop", "props", "ptr", "py", "readonly", "refactor", "regex", "regexp", "repo", "req",
    "res", "runtime", "schema", "sdk", "setter", "spec", "sql", "src", "stderr", "stdin",
    "stdout", "str", "struct", "stub", "sync", "timeout", "tmp", "todo", "toml", "ts", "tsx",
    "tuple", "typeof", "ui", "uri", "url", "usr", "utf", "util", "utils", "uuid", "var", "void",
    "webpack", "xml", "yaml",
];

/// Frequent misspellings and their corrections
pub const COMMON_TYPOS: &[(&str, &str)] = &[
    ("recieve", "receive"),
    ("recieved", "received"),
    ("lenght", "length"),
    ("widht", "width"),
    ("heigth", "height"),
    ("parmeter", "parameter"),
    ("paramter", "parameter"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occured", "occurred"),
    ("occurence", "occurrence"),
    ("compnent", "component"),
    ("functon", "function"),
    ("retrun", "return"),
    ("calback", "callback"),
    ("promis", "promise"),
    ("responce", "response"),
    ("requets", "request"),
    ("intialize", "initialize"),
    ("seralize", "serialize"),
    ("destory", "destroy"),
    ("conection", "connection"),
    ("sucessful", "successful"),
    ("succesful", "successful"),
    ("adress", "address"),
    ("enviroment", "environment"),
    ("existant", "existent"),
    ("accross", "across"),
    ("untill", "until"),
    ("wierd", "weird"),
    ("teh", "the"),
];
