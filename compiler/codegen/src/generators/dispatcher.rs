//! Dispatcher generator.
//!
//! Every handler `XHandler` becomes an `XEvent` type holding its subscribers,
//! plus the operations its policy selects. All events of a model go into one
//! file sharing a single import block.

use std::fmt::Write as _;

use analysis::{EventModel, MethodModel, Model, SYNC_PATH};
use registry::ImportTier;
use types::{DeliveryMode, Policy, ShapeKind};

use crate::utils::{clean_generated_source, prefix_ident};
use crate::{CodeGenerator, CodegenError, Result};

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by evon. DO NOT EDIT.";

/// Buffer size of a subscriber queue.
pub const QUEUE_CAPACITY: usize = 64;

/// Members a dispatcher type gets under `policy`, other than its dispatch methods.
fn generated_members(policy: &Policy) -> Vec<&'static str> {
    let mut members = vec!["Sub", "subs"];
    if policy.lock {
        members.push("mu");
    }
    if policy.pause {
        members.extend(["Pause", "Resume", "paused"]);
    }
    if policy.unsub {
        members.push("evonUnsub");
    }
    if policy.catch {
        members.extend(["OnPanic", "evonRecover"]);
    }
    members
}

/// Renders every event of a model into one Go source file.
#[derive(Debug, Clone)]
pub struct DispatcherGenerator {
    file_name: String,
}

impl DispatcherGenerator {
    /// Create a generator writing to `file_name`.
    pub fn new(file_name: impl Into<String>) -> Self { Self { file_name: file_name.into() } }

    /// Name of the generated file.
    pub fn file_name(&self) -> &str { &self.file_name }

    /// Render the whole file.
    pub fn render(&self, model: &Model) -> Result<String> {
        let sync = SyncTypes::new(model);
        let mut code = String::new();

        generate_header(&mut code, model)?;
        generate_sync_aliases(&mut code, model)?;
        for event in &model.events {
            logging::trace("codegen", &format!("rendering {} for {}", event.name, event.handler));
            generate_event(&mut code, event, &sync)?;
        }

        Ok(clean_generated_source(&code))
    }
}

impl CodeGenerator for DispatcherGenerator {
    fn generate(&self, model: &Model) -> Result<Vec<(String, String)>> {
        self.validate(model)?;
        Ok(vec![(self.file_name.clone(), self.render(model)?)])
    }

    /// Reject interface methods that would clash with a generated member.
    fn validate(&self, model: &Model) -> Result<()> {
        for event in &model.events {
            let members = generated_members(&event.policy);
            let clash = event.methods.iter().find(|m| members.contains(&m.name.as_str()));
            if let Some(method) = clash {
                return Err(CodegenError::Message(format!(
                    "{}: method \"{}\" of \"{}\" clashes with a member of the generated \"{}\"",
                    event.position, method.name, event.handler, event.name
                )));
            }
        }
        Ok(())
    }
}

/// Spelling of the sync types inside the generated file.
struct SyncTypes {
    mutex: String,
    wait_group: String,
}

impl SyncTypes {
    fn new(model: &Model) -> Self {
        if model.rename_sync_types {
            return Self { mutex: "evonMutex".into(), wait_group: "evonWaitGroup".into() };
        }
        let alias = sync_alias(model);
        Self { mutex: format!("{}.Mutex", alias), wait_group: format!("{}.WaitGroup", alias) }
    }
}

fn sync_alias(model: &Model) -> &str { model.imports.alias_of(SYNC_PATH).unwrap_or(SYNC_PATH) }

/// Identifiers used by the code of one event.
struct Names<'m> {
    event: &'m EventModel,
    sub: String,
    ev: &'m str,
    s: &'m str,
    wg: &'m str,
}

impl<'m> Names<'m> {
    fn new(event: &'m EventModel) -> Self {
        Self {
            event,
            sub: event.sub.clone(),
            ev: event.helper("ev"),
            s: event.helper("s"),
            wg: event.helper("wg"),
        }
    }

    fn policy(&self) -> &Policy { &self.event.policy }
}

fn generate_header(code: &mut String, model: &Model) -> Result<()> {
    writeln!(code, "{}\n\npackage {}", HEADER, model.package)?;

    let entries = model.imports.entries();
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(code, "\nimport (")?;
    let mut previous: Option<ImportTier> = None;
    for entry in entries {
        let dependency = entry.tier == ImportTier::Dependency;
        if previous.is_some_and(|tier| (tier == ImportTier::Dependency) != dependency) {
            writeln!(code)?;
        }
        match entry.explicit_alias() {
            Some(alias) => writeln!(code, "\t{} \"{}\"", alias, entry.path)?,
            None => writeln!(code, "\t\"{}\"", entry.path)?,
        }
        previous = Some(entry.tier);
    }
    writeln!(code, ")")?;
    Ok(())
}

/// A parameter named like the sync package hides it inside dispatch methods,
/// so sync types are reached through package-level aliases instead.
fn generate_sync_aliases(code: &mut String, model: &Model) -> Result<()> {
    if !(model.need_sync && model.rename_sync_types) {
        return Ok(());
    }
    let alias = sync_alias(model);
    writeln!(
        code,
        "\ntype (\n\tevonMutex     = {}.Mutex\n\tevonWaitGroup = {}.WaitGroup\n)",
        alias, alias
    )?;
    Ok(())
}

fn generate_event(code: &mut String, event: &EventModel, sync: &SyncTypes) -> Result<()> {
    let names = Names::new(event);
    let policy = names.policy();

    generate_event_struct(code, &names, sync)?;
    generate_sub_struct(code, &names)?;
    generate_constructor(code, &names)?;
    generate_subscribe(code, &names)?;
    if policy.unsub {
        generate_unsubscribe(code, &names)?;
    }
    if policy.pause {
        generate_pause(code, &names)?;
    }
    if policy.catch {
        generate_recover(code, &names)?;
    }
    for method in &event.methods {
        generate_dispatch(code, &names, method, sync)?;
    }
    Ok(())
}

fn generate_event_struct(code: &mut String, names: &Names, sync: &SyncTypes) -> Result<()> {
    let event = names.event;
    let policy = names.policy();

    let mut fields: Vec<(&str, String)> = Vec::new();
    if policy.catch {
        fields.push(("OnPanic", "func(interface{})".to_string()));
    }
    if policy.lock {
        fields.push(("mu", sync.mutex.clone()));
    }
    if policy.pause {
        fields.push(("paused", "bool".to_string()));
    }
    fields.push(("subs", format!("[]*{}", names.sub)));

    writeln!(code, "\n// {} dispatches calls to subscribed {} values.", event.name, event.handler)?;
    if policy.catch {
        writeln!(code, "//\n// Handler panics are recovered and passed to OnPanic when it is set.")?;
    }
    writeln!(code, "type {} struct {{", event.name)?;
    write_fields(code, &fields)?;
    writeln!(code, "}}")?;
    Ok(())
}

fn generate_sub_struct(code: &mut String, names: &Names) -> Result<()> {
    let queued = names.policy().delivery == DeliveryMode::Queue;

    let mut fields = vec![("h", names.event.handler.clone())];
    if queued {
        fields.push(("q", "chan func()".to_string()));
    }

    writeln!(code, "\ntype {} struct {{", names.sub)?;
    write_fields(code, &fields)?;
    writeln!(code, "}}")?;

    if queued {
        writeln!(
            code,
            "\nfunc (s *{}) run() {{\n\tfor f := range s.q {{\n\t\tf()\n\t}}\n}}",
            names.sub
        )?;
    }
    Ok(())
}

fn write_fields(code: &mut String, fields: &[(&str, String)]) -> Result<()> {
    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, ty) in fields {
        writeln!(code, "\t{:<width$} {}", name, ty, width = width)?;
    }
    Ok(())
}

fn generate_constructor(code: &mut String, names: &Names) -> Result<()> {
    let event = &names.event.name;
    let constructor = prefix_ident("new", event);
    writeln!(
        code,
        "\n// {} returns a {} without subscribers.\nfunc {}() *{} {{\n\treturn &{}{{}}\n}}",
        constructor, event, constructor, event, event
    )?;
    Ok(())
}

fn write_lock(code: &mut String, receiver: &str, policy: &Policy) -> Result<()> {
    if policy.lock {
        writeln!(code, "\t{}.mu.Lock()\n\tdefer {}.mu.Unlock()", receiver, receiver)?;
    }
    Ok(())
}

fn generate_subscribe(code: &mut String, names: &Names) -> Result<()> {
    let event = names.event;
    let policy = names.policy();

    writeln!(code, "\n// Sub adds h to the subscribers.")?;
    if policy.unsub {
        writeln!(code, "// The returned function removes it again.")?;
        writeln!(code, "func (ev *{}) Sub(h {}) func() {{", event.name, event.handler)?;
    } else {
        writeln!(code, "func (ev *{}) Sub(h {}) {{", event.name, event.handler)?;
    }
    write_lock(code, "ev", policy)?;
    writeln!(code, "\ts := &{}{{h: h}}", names.sub)?;
    if policy.delivery == DeliveryMode::Queue {
        writeln!(code, "\ts.q = make(chan func(), {})\n\tgo s.run()", QUEUE_CAPACITY)?;
    }
    writeln!(code, "\tev.subs = append(ev.subs, s)")?;
    if policy.unsub {
        writeln!(code, "\treturn func() {{ ev.evonUnsub(s) }}")?;
    }
    writeln!(code, "}}")?;
    Ok(())
}

fn generate_unsubscribe(code: &mut String, names: &Names) -> Result<()> {
    let policy = names.policy();

    writeln!(code, "\nfunc (ev *{}) evonUnsub(s *{}) {{", names.event.name, names.sub)?;
    write_lock(code, "ev", policy)?;
    writeln!(code, "\tfor i, x := range ev.subs {{\n\t\tif x == s {{")?;
    // A fresh backing array keeps in-flight dispatch loops intact.
    writeln!(code, "\t\t\tev.subs = append(ev.subs[:i:i], ev.subs[i+1:]...)")?;
    if policy.delivery == DeliveryMode::Queue {
        writeln!(code, "\t\t\tclose(s.q)")?;
    }
    writeln!(code, "\t\t\treturn\n\t\t}}\n\t}}\n}}")?;
    Ok(())
}

fn generate_pause(code: &mut String, names: &Names) -> Result<()> {
    let event = &names.event.name;
    let policy = names.policy();

    writeln!(code, "\n// Pause drops dispatched calls until Resume is called.")?;
    writeln!(code, "func (ev *{}) Pause() {{", event)?;
    write_lock(code, "ev", policy)?;
    writeln!(code, "\tev.paused = true\n}}")?;

    writeln!(code, "\n// Resume undoes Pause.")?;
    writeln!(code, "func (ev *{}) Resume() {{", event)?;
    write_lock(code, "ev", policy)?;
    writeln!(code, "\tev.paused = false\n}}")?;
    Ok(())
}

fn generate_recover(code: &mut String, names: &Names) -> Result<()> {
    writeln!(
        code,
        "\nfunc (ev *{}) evonRecover() {{\n\tif r := recover(); r != nil && ev.OnPanic != nil {{\n\t\tev.OnPanic(r)\n\t}}\n}}",
        names.event.name
    )?;
    Ok(())
}

fn generate_dispatch(
    code: &mut String,
    names: &Names,
    method: &MethodModel,
    sync: &SyncTypes,
) -> Result<()> {
    let event = names.event;
    let policy = names.policy();
    let (ev, s, wg) = (names.ev, names.s, names.wg);

    let (name, call) = match event.kind {
        ShapeKind::Func => ("Emit", format!("{}.h({})", s, method.args)),
        ShapeKind::Interface => {
            (method.name.as_str(), format!("{}.h.{}({})", s, method.name, method.args))
        }
    };
    let returns =
        if method.returns.is_empty() { String::new() } else { format!(" ({})", method.returns) };

    writeln!(code, "\n// {} {}.", name, delivery_doc(event, policy))?;
    writeln!(code, "func ({} *{}) {}({}){} {{", ev, event.name, name, method.params, returns)?;
    write_lock(code, ev, policy)?;
    if policy.pause {
        writeln!(code, "\tif {}.paused {{\n\t\treturn\n\t}}", ev)?;
    }
    let wait = policy.needs_wait_group();
    if wait {
        writeln!(code, "\tvar {} {}", wg, sync.wait_group)?;
    }

    writeln!(code, "\tfor _, {} := range {}.subs {{", s, ev)?;
    match policy.delivery {
        DeliveryMode::Synchronous if policy.catch => {
            writeln!(code, "\t\tfunc() {{\n\t\t\tdefer {}.evonRecover()\n\t\t\t{}\n\t\t}}()", ev, call)?;
        }
        DeliveryMode::Synchronous => writeln!(code, "\t\t{}", call)?,
        DeliveryMode::Spawn if wait || policy.catch => {
            if wait {
                writeln!(code, "\t\t{}.Add(1)", wg)?;
            }
            writeln!(code, "\t\tgo func({} *{}) {{", s, names.sub)?;
            write_deferred(code, names, policy)?;
            writeln!(code, "\t\t\t{}\n\t\t}}({})", call, s)?;
        }
        DeliveryMode::Spawn => writeln!(code, "\t\tgo {}", call)?,
        DeliveryMode::Queue => {
            writeln!(code, "\t\t{} := {}", s, s)?;
            if wait {
                writeln!(code, "\t\t{}.Add(1)", wg)?;
            }
            writeln!(code, "\t\t{}.q <- func() {{", s)?;
            write_deferred(code, names, policy)?;
            writeln!(code, "\t\t\t{}\n\t\t}}", call)?;
        }
    }
    writeln!(code, "\t}}")?;

    if wait {
        writeln!(code, "\t{}.Wait()", wg)?;
    }
    // Results are blank-named, so a bare return is enough.
    if !method.returns.is_empty() {
        writeln!(code, "\treturn")?;
    }
    writeln!(code, "}}")?;
    Ok(())
}

/// Deferred calls at the top of an asynchronous delivery. `Done` is deferred
/// first so it runs after the panic is handled.
fn write_deferred(code: &mut String, names: &Names, policy: &Policy) -> Result<()> {
    if policy.needs_wait_group() {
        writeln!(code, "\t\t\tdefer {}.Done()", names.wg)?;
    }
    if policy.catch {
        writeln!(code, "\t\t\tdefer {}.evonRecover()", names.ev)?;
    }
    Ok(())
}

fn delivery_doc(event: &EventModel, policy: &Policy) -> String {
    let target = match event.kind {
        ShapeKind::Func => "calls every subscriber".to_string(),
        ShapeKind::Interface => "forwards the call to every subscriber".to_string(),
    };
    let how = match policy.delivery {
        DeliveryMode::Synchronous => "in subscription order",
        DeliveryMode::Spawn => "on a new goroutine per call",
        DeliveryMode::Queue => "through the subscriber's queue",
    };
    if policy.needs_wait_group() {
        format!("{} {} and waits until all calls return", target, how)
    } else {
        format!("{} {}", target, how)
    }
}
