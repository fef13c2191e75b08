use crate::command::{Command, CommandInner};
use crate::model::Model;
use futures::future::{join_all, BoxFuture};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

/// A headless harness that drives a [`Model`] without a terminal.
///
/// Immediate messages returned from `update` are queued and flushed by
/// [`drain_messages`](TestProgram::drain_messages). Async commands are parked
/// rather than spawned; [`settle`](TestProgram::settle) awaits them and feeds
/// their messages back, so a whole fetch flow can run inside one
/// `#[tokio::test]` against a fake source.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Storefront>::new(flags);
/// prog.settle().await;
/// assert!(prog.render_string(100, 40).contains("$549.00"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    pending_tasks: Vec<BoxFuture<'static, M::Message>>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] and collect its startup command.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            pending_tasks: Vec::new(),
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Run one update cycle with `msg`.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process queued immediate messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                self.send(msg);
            }
        }
    }

    /// Await every parked async command, deliver the results in the order
    /// the commands were issued, and repeat until nothing is pending.
    pub async fn settle(&mut self) {
        loop {
            self.drain_messages();
            if self.pending_tasks.is_empty() {
                break;
            }
            let tasks: Vec<_> = self.pending_tasks.drain(..).collect();
            for msg in join_all(tasks).await {
                self.send(msg);
            }
        }
    }

    /// Take the parked async commands without running them, so a test can
    /// resolve them in a chosen order.
    pub fn take_tasks(&mut self) -> Vec<BoxFuture<'static, M::Message>> {
        self.pending_tasks.drain(..).collect()
    }

    /// Number of async commands waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.pending_tasks.len()
    }

    /// Whether any update returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Shared access to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Render into a [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let mut terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test backend never fails");
        terminal
            .draw(|frame| self.model.view(frame))
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Render and return the screen as text, one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let mut output = String::new();
        for y in 0..height {
            for x in 0..width {
                output.push_str(buf[(x, y)].symbol());
            }
            if y + 1 < height {
                output.push('\n');
            }
        }
        output
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => self.pending_messages.push(msg),
            CommandInner::Quit => self.quit = true,
            CommandInner::Future(fut) => self.pending_tasks.push(fut),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}
