//! Command sets and their static replies.

use teloxide::utils::command::BotCommands;

pub const MANUAL_START: &str = "Привіт! Я бот для Conflict of Nations.\n\n\
⚠️ На жаль, автоматичний парсинг сайту неможливий на безкоштовному сервері.\n\n\
Але ви можете:\n\
/manual - Відправити дані вручну\n\
/help - Допомога";

pub const MANUAL_INSTRUCTIONS: &str = "📝 Як користуватися:\n\n\
1. Відкрийте Conflict of Nations на телефоні\n\
2. Зайдіть в Ігри → Пошук\n\
3. Скопіюйте інформацію про карти\n\
4. Відправте мені текстом\n\
5. Я перешлю в групу\n\n\
Просто відправте текст після цієї команди!";

pub const MANUAL_HELP: &str = "📖 Інформація:\n\n\
Через обмеження безкоштовного хостингу, бот не може автоматично заходити на сайт.\n\n\
Рішення:\n\
1. Використовуйте /manual щоб відправляти дані вручну\n\
2. Або запускайте бота локально на комп'ютері з Selenium";

pub const CHECK_START: &str = "Привіт! Я бот для Conflict of Nations.\n\n\
Команди:\n\
/check - Перевірити активні карти\n\
/help - Допомога";

pub const CHECK_HELP: &str = "📖 Інформація:\n\n\
/check відкриває сайт гри, переходить в Ігри → Пошук і надсилає список активних карт.\n\n\
Перевірка триває до хвилини, статус оновлюється в першому повідомленні.";

/// Label of the status message edited during `/check`.
pub const CHECKING_LABEL: &str = "🔍 Перевіряю карти...";

pub const RELAYED: &str = "✅ Дякую! Дані переслано в групу.";
pub const RECEIVED: &str = "✅ Дякую! Дані отримано.";
pub const UNKNOWN_COMMAND: &str = "🤷 Невідома команда. Спробуйте /help";

/// Commands of the manual variant.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступні команди:")]
pub enum ManualCommand {
    #[command(description = "почати")]
    Start,
    #[command(description = "відправити дані вручну")]
    Manual,
    #[command(description = "допомога")]
    Help,
}

impl ManualCommand {
    pub fn reply(&self) -> &'static str {
        match self {
            Self::Start => MANUAL_START,
            Self::Manual => MANUAL_INSTRUCTIONS,
            Self::Help => MANUAL_HELP,
        }
    }
}

/// Commands of the automated variant.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступні команди:")]
pub enum CheckCommand {
    #[command(description = "почати")]
    Start,
    #[command(description = "перевірити активні карти")]
    Check,
    #[command(description = "допомога")]
    Help,
}

impl CheckCommand {
    /// Static reply, `None` for `/check`.
    pub fn reply(&self) -> Option<&'static str> {
        match self {
            Self::Start => Some(CHECK_START),
            Self::Help => Some(CHECK_HELP),
            Self::Check => None,
        }
    }
}

/// Text of the status message for one progress update.
pub fn status_text(status: &str) -> String {
    format!("{}\n\n{}", CHECKING_LABEL, status)
}
