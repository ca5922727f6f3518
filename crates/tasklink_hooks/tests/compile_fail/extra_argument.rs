use tasklink_hooks::task_hooks;

pub struct Job;

#[task_hooks]
impl Job {
    #[post_task]
    pub fn check(&self, _input: &u32, _strict: bool) {}
}

fn main() {}
