mod intro_vm;
mod markdown_vm;
mod results_vm;
mod session_vm;
mod time_fmt;

pub use intro_vm::IntroVm;
pub use markdown_vm::solution_plain_text;
pub use results_vm::{AnswerRowVm, ResultsVm};
pub use session_vm::{OptionVm, QuestionScreenVm};
pub use time_fmt::{format_countdown, format_datetime, format_elapsed, format_marks};
