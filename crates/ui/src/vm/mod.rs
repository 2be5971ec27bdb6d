mod quiz_vm;

pub use quiz_vm::{QuestionCardVm, map_question_card};
