//! Locale selector and user-facing label text
//!
//! Every string the grid or the viewer shows to a user comes from a
//! [`Labels`] table picked by [`Locale`].

use serde::{Deserialize, Serialize};

/// Two-value locale selector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Zh => &ZH,
        }
    }

    /// The other locale (used by the viewer's locale switch)
    pub fn toggle(self) -> Self {
        match self {
            Locale::En => Locale::Zh,
            Locale::Zh => Locale::En,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }
}

/// Label table for one locale
#[derive(Debug)]
pub struct Labels {
    // Toolbar
    pub components: &'static str,
    pub search_placeholder: &'static str,
    pub error_spans: &'static str,
    pub matched_spans: &'static str,
    pub previous: &'static str,
    pub next: &'static str,

    // Span timeline columns
    pub span: &'static str,
    pub start_time: &'static str,
    pub service: &'static str,
    pub host: &'static str,

    // Chain metric columns
    pub chain: &'static str,
    pub span_per_request: &'static str,
    pub request_ratio: &'static str,
    pub error_ratio: &'static str,
    pub cost: &'static str,
    pub max_subtree_nodes: &'static str,
    pub avg_network_cost: &'static str,
    pub avg_local_pure_cost: &'static str,
    pub mark: &'static str,
    pub action: &'static str,
    pub view_span: &'static str,

    // Viewer chrome
    pub empty: &'static str,
    pub updated: &'static str,
    pub help: &'static str,
    pub sample_trace: &'static str,
    pub sample_chain: &'static str,
    /// Unit after a span count
    pub spans: &'static str,
    /// Unit after a chain node count
    pub nodes: &'static str,
    pub max: &'static str,

    // Status messages
    pub no_tag: &'static str,
    pub filters_cleared: &'static str,
    pub language: &'static str,
    pub reload_failed: &'static str,

    // Footer key hints and help overlay body
    pub keys_search: &'static str,
    pub keys_normal: &'static str,
    pub keys_no_toolbar: &'static str,
    pub help_text: &'static str,
}

pub static EN: Labels = Labels {
    components: "Components",
    search_placeholder: "Search spans by keyword",
    error_spans: "Error Spans",
    matched_spans: "Matched Spans",
    previous: "Previous",
    next: "Next",

    span: "Span",
    start_time: "Start Time",
    service: "Service",
    host: "Host",

    chain: "Chain",
    span_per_request: "Span / Request",
    request_ratio: "Request Count / Ratio",
    error_ratio: "Error Count / Error Ratio",
    cost: "Cost",
    max_subtree_nodes: "Max Subtree Nodes",
    avg_network_cost: "Avg Network Cost",
    avg_local_pure_cost: "Avg Local Pure Cost",
    mark: "Mark",
    action: "Action",
    view_span: "View Span",

    empty: "No spans to show",
    updated: "Updated",
    help: "Help",
    sample_trace: "sample trace",
    sample_chain: "sample chain",
    spans: "spans",
    nodes: "nodes",
    max: "max",

    no_tag: "No component tag",
    filters_cleared: "Filters cleared",
    language: "Language",
    reload_failed: "Reload failed",

    keys_search: "type to search  Enter:keep  Esc:cancel",
    keys_normal: "j/k:move  Space:fold  Enter:click  /:search  1-9:tag  e:errors  n/N:match  C:clear  h/l:scroll  ?:help  q:quit",
    keys_no_toolbar: "j/k:move  Space:fold  Enter:click  h/l:scroll  H:toolbar  ?:help  q:quit",
    help_text: r#"
  Rows
  ─────────────────────────────────
  j/k, ↑/↓     Move up/down
  g / G        Jump to top / bottom
  Ctrl+d/u     Page down/up
  Space        Expand / collapse
  Enter        Click row
  h/l, ←/→     Scroll columns

  Highlighter
  ─────────────────────────────────
  /            Edit keyword
  1-9          Toggle component tag
  e            Error spans only
  n / N        Next / previous match
  C            Clear all filters
  H            Show / hide toolbar

  Other
  ─────────────────────────────────
  L            Switch language
  r            Reload
  q            Quit

  Press ? or Esc to close
"#,
};

pub static ZH: Labels = Labels {
    components: "组件标签",
    search_placeholder: "请按关键字搜索 Span",
    error_spans: "查看异常Span",
    matched_spans: "已查找Span",
    previous: "上一个",
    next: "下一个",

    span: "Span",
    start_time: "起始时间",
    service: "服务名",
    host: "主机",

    chain: "链路",
    span_per_request: "Span数/请求倍数",
    request_ratio: "请求数/请求比例",
    error_ratio: "错误请求数/错误请求比例",
    cost: "耗时",
    max_subtree_nodes: "最大子树节点数",
    avg_network_cost: "平均网络调用耗时",
    avg_local_pure_cost: "平均本地净耗时",
    mark: "标记",
    action: "操作",
    view_span: "查看Span",

    empty: "暂无数据",
    updated: "已更新",
    help: "帮助",
    sample_trace: "示例调用链",
    sample_chain: "示例链路",
    spans: "个Span",
    nodes: "个节点",
    max: "最大",

    no_tag: "没有组件标签",
    filters_cleared: "已清除筛选",
    language: "语言",
    reload_failed: "重新加载失败",

    keys_search: "输入关键字  Enter:保留  Esc:取消",
    keys_normal: "j/k:移动  Space:折叠  Enter:点击  /:搜索  1-9:标签  e:异常  n/N:匹配  C:清除  h/l:滚动  ?:帮助  q:退出",
    keys_no_toolbar: "j/k:移动  Space:折叠  Enter:点击  h/l:滚动  H:工具栏  ?:帮助  q:退出",
    help_text: r#"
  行
  ─────────────────────────────────
  j/k, ↑/↓     上移 / 下移
  g / G        跳到顶部 / 底部
  Ctrl+d/u     向下 / 向上翻页
  Space        展开 / 折叠
  Enter        点击行
  h/l, ←/→     横向滚动

  高亮
  ─────────────────────────────────
  /            编辑关键字
  1-9          切换组件标签
  e            仅看异常Span
  n / N        下一个 / 上一个匹配
  C            清除全部筛选
  H            显示 / 隐藏工具栏

  其他
  ─────────────────────────────────
  L            切换语言
  r            重新加载
  q            退出

  按 ? 或 Esc 关闭
"#,
};
