/// Every instruction/status line the core can ask the UI to show. The UI
/// picks a language and copies the text into its sink; nothing here is an
/// error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Auto-merge variant start prompt.
    DragChains,
    /// Two chain ends touched and were joined.
    Connected,
    /// Only one chain is left.
    AllConnected,
    /// Puzzle variant idle prompt.
    PickLink,
    LinkOpened,
    OneConnected,
    TwoConnected,
    LinkClosed,
    Cancelled,
}

impl Instruction {
    pub fn en(&self) -> &'static str {
        match self {
            Instruction::DragChains => "Drag the chains and touch two chain ends together",
            Instruction::Connected => "Connected!",
            Instruction::AllConnected => "All chains connected!",
            Instruction::PickLink => "Click a link to open it",
            Instruction::LinkOpened => {
                "Click an end link of another chain to connect it, or click the opened link to close"
            }
            Instruction::OneConnected => {
                "Connect a second chain end, or click the opened link to close it"
            }
            Instruction::TwoConnected => "Click the opened link to close it",
            Instruction::LinkClosed => "Link closed",
            Instruction::Cancelled => "Cancelled",
        }
    }

    pub fn zh(&self) -> &'static str {
        match self {
            Instruction::DragChains => "拖动链条，让两个链条的末端相互接触",
            Instruction::Connected => "已连接！",
            Instruction::AllConnected => "所有链条已连成一条！",
            Instruction::PickLink => "点击一个链环将其打开",
            Instruction::LinkOpened => "点击另一条链条的末端链环进行连接，或再次点击已打开的链环将其闭合",
            Instruction::OneConnected => "再连接一个链条末端，或点击已打开的链环将其闭合",
            Instruction::TwoConnected => "点击已打开的链环将其闭合",
            Instruction::LinkClosed => "链环已闭合",
            Instruction::Cancelled => "已取消",
        }
    }

    /// Text for a UI language tag; anything but `"zh"` falls back to English.
    pub fn text(&self, lang: &str) -> &'static str {
        if lang == "zh" { self.zh() } else { self.en() }
    }
}
