//! Kind-specific record operations layered on the generic collection API.

use super::{insert_record, remove_record, replace_record, ProjectStore};
use crate::entity::{Record, SectionCodec};
use crate::error::{StoreError, StoreResult};
use crate::markup::ids::random_hex_id;
use crate::markup::section::Document;
use crate::model::billing::{invoice_number, quote_number, Invoice, Payment, Quote};
use crate::model::capacity::{CapacityPlan, TeamMember, WeeklyAllocation};
use crate::model::note::Note;
use crate::model::planning::{with_backlinks, Idea, IdeaWithBacklinks};
use crate::model::strategy::{StrategicBuilder, StrategicLevel};

const MEMBER_KIND: &str = "team member";
const ALLOCATION_KIND: &str = "allocation";
const LEVEL_KIND: &str = "strategic level";

/// Finds the child `id` in `items`.
fn child_slot<'a, T>(
    items: &'a mut [T],
    kind: &'static str,
    id: &str,
    id_of: impl Fn(&T) -> &str,
) -> StoreResult<&'a mut T> {
    items
        .iter_mut()
        .find(|item| id_of(item) == id)
        .ok_or_else(|| StoreError::not_found(kind, id))
}

fn fresh_child_id<T>(items: &[T], id: &str, id_of: impl Fn(&T) -> &str) -> String {
    if !id.is_empty() && !items.iter().any(|item| id_of(item) == id) {
        return id.to_string();
    }
    loop {
        let candidate = random_hex_id();
        if !items.iter().any(|item| id_of(item) == candidate) {
            return candidate;
        }
    }
}

fn parent_slot<'a, T: Record>(records: &'a mut [T], id: &str) -> StoreResult<&'a mut T> {
    records
        .iter_mut()
        .find(|record| record.id() == id)
        .ok_or_else(|| StoreError::not_found(T::KIND, id))
}

impl ProjectStore {
    // Notes

    /// Creates a note stamped with the current time and revision 1.
    pub fn create_note(&self, mut note: Note) -> StoreResult<Note> {
        note.stamp_created(&self.clock.now());
        self.create(note)
    }

    /// Replaces a note, keeping `created_at` and bumping the revision.
    pub fn update_note(&self, id: &str, mut note: Note) -> StoreResult<Note> {
        let now = self.clock.now();
        self.modify(|notes: &mut Vec<Note>| {
            let previous = notes
                .iter()
                .find(|existing| existing.id == id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(Note::KIND, id))?;
            note.stamp_updated(&previous, &now);
            replace_record(notes, id, note)
        })
    }

    // Ideas

    pub fn create_idea(&self, mut idea: Idea) -> StoreResult<Idea> {
        if idea.created.is_empty() {
            idea.created = self.clock.today();
        }
        self.create(idea)
    }

    pub fn read_ideas_with_backlinks(&self) -> StoreResult<Vec<IdeaWithBacklinks>> {
        Ok(with_backlinks(self.read_all::<Idea>()?))
    }

    // Capacity plans

    pub fn add_team_member(&self, plan_id: &str, mut member: TeamMember) -> StoreResult<TeamMember> {
        self.modify(|plans: &mut Vec<CapacityPlan>| {
            let plan = parent_slot(plans, plan_id)?;
            member.id = fresh_child_id(&plan.team_members, &member.id, |m| m.id.as_str());
            plan.team_members.push(member.clone());
            Ok(member)
        })
    }

    pub fn update_team_member(
        &self,
        plan_id: &str,
        member_id: &str,
        mut member: TeamMember,
    ) -> StoreResult<TeamMember> {
        self.modify(|plans: &mut Vec<CapacityPlan>| {
            let plan = parent_slot(plans, plan_id)?;
            let slot =
                child_slot(&mut plan.team_members, MEMBER_KIND, member_id, |m| m.id.as_str())?;
            member.id = member_id.to_string();
            *slot = member.clone();
            Ok(member)
        })
    }

    pub fn delete_team_member(&self, plan_id: &str, member_id: &str) -> StoreResult<()> {
        self.modify(|plans: &mut Vec<CapacityPlan>| {
            let plan = parent_slot(plans, plan_id)?;
            let before = plan.team_members.len();
            plan.team_members.retain(|m| m.id != member_id);
            if plan.team_members.len() == before {
                return Err(StoreError::not_found(MEMBER_KIND, member_id));
            }
            Ok(())
        })
    }

    pub fn add_allocation(
        &self,
        plan_id: &str,
        mut allocation: WeeklyAllocation,
    ) -> StoreResult<WeeklyAllocation> {
        self.modify(|plans: &mut Vec<CapacityPlan>| {
            let plan = parent_slot(plans, plan_id)?;
            allocation.id = fresh_child_id(&plan.allocations, &allocation.id, |a| a.id.as_str());
            plan.allocations.push(allocation.clone());
            Ok(allocation)
        })
    }

    pub fn update_allocation(
        &self,
        plan_id: &str,
        allocation_id: &str,
        mut allocation: WeeklyAllocation,
    ) -> StoreResult<WeeklyAllocation> {
        self.modify(|plans: &mut Vec<CapacityPlan>| {
            let plan = parent_slot(plans, plan_id)?;
            let slot = child_slot(&mut plan.allocations, ALLOCATION_KIND, allocation_id, |a| {
                a.id.as_str()
            })?;
            allocation.id = allocation_id.to_string();
            *slot = allocation.clone();
            Ok(allocation)
        })
    }

    pub fn delete_allocation(&self, plan_id: &str, allocation_id: &str) -> StoreResult<()> {
        self.modify(|plans: &mut Vec<CapacityPlan>| {
            let plan = parent_slot(plans, plan_id)?;
            let before = plan.allocations.len();
            plan.allocations.retain(|a| a.id != allocation_id);
            if plan.allocations.len() == before {
                return Err(StoreError::not_found(ALLOCATION_KIND, allocation_id));
            }
            Ok(())
        })
    }

    // Strategic levels

    pub fn add_strategic_level(
        &self,
        builder_id: &str,
        mut level: StrategicLevel,
    ) -> StoreResult<StrategicLevel> {
        self.modify(|builders: &mut Vec<StrategicBuilder>| {
            let builder = parent_slot(builders, builder_id)?;
            level.id = fresh_child_id(&builder.levels, &level.id, |l| l.id.as_str());
            level.order = builder.levels.len();
            builder.levels.push(level.clone());
            Ok(level)
        })
    }

    pub fn update_strategic_level(
        &self,
        builder_id: &str,
        level_id: &str,
        mut level: StrategicLevel,
    ) -> StoreResult<StrategicLevel> {
        self.modify(|builders: &mut Vec<StrategicBuilder>| {
            let builder = parent_slot(builders, builder_id)?;
            let slot = child_slot(&mut builder.levels, LEVEL_KIND, level_id, |l| l.id.as_str())?;
            level.id = level_id.to_string();
            level.order = slot.order;
            *slot = level.clone();
            Ok(level)
        })
    }

    /// Removes a level; levels that named it as parent become top-level.
    pub fn delete_strategic_level(&self, builder_id: &str, level_id: &str) -> StoreResult<()> {
        self.modify(|builders: &mut Vec<StrategicBuilder>| {
            let builder = parent_slot(builders, builder_id)?;
            let before = builder.levels.len();
            builder.levels.retain(|l| l.id != level_id);
            if builder.levels.len() == before {
                return Err(StoreError::not_found(LEVEL_KIND, level_id));
            }
            for level in &mut builder.levels {
                if level.parent_id == level_id {
                    level.parent_id.clear();
                }
            }
            builder.renumber();
            Ok(())
        })
    }

    // Billing

    pub fn next_quote_number(&self) -> StoreResult<String> {
        Ok(quote_number(self.read_all::<Quote>()?.len()))
    }

    pub fn next_invoice_number(&self) -> StoreResult<String> {
        Ok(invoice_number(self.read_all::<Invoice>()?.len()))
    }

    /// Creates a quote, filling `number` and `created` when empty.
    pub fn create_quote(&self, mut quote: Quote) -> StoreResult<Quote> {
        let today = self.clock.today();
        self.modify(|quotes: &mut Vec<Quote>| {
            if quote.number.is_empty() {
                quote.number = quote_number(quotes.len());
            }
            if quote.created.is_empty() {
                quote.created = today;
            }
            insert_record(quotes, quote)
        })
    }

    pub fn update_quote(&self, id: &str, mut quote: Quote) -> StoreResult<Quote> {
        self.modify(|quotes: &mut Vec<Quote>| {
            let previous = parent_slot(quotes, id)?;
            quote.created = previous.created.clone();
            replace_record(quotes, id, quote)
        })
    }

    /// Creates an invoice, filling `number` and `created` when empty.
    pub fn create_invoice(&self, mut invoice: Invoice) -> StoreResult<Invoice> {
        let today = self.clock.today();
        self.modify(|invoices: &mut Vec<Invoice>| {
            if invoice.number.is_empty() {
                invoice.number = invoice_number(invoices.len());
            }
            if invoice.created.is_empty() {
                invoice.created = today;
            }
            insert_record(invoices, invoice)
        })
    }

    pub fn update_invoice(&self, id: &str, mut invoice: Invoice) -> StoreResult<Invoice> {
        self.modify(|invoices: &mut Vec<Invoice>| {
            let previous = parent_slot(invoices, id)?;
            invoice.created = previous.created.clone();
            replace_record(invoices, id, invoice)
        })
    }

    pub fn delete_invoice(&self, id: &str) -> StoreResult<Invoice> {
        self.modify(|invoices: &mut Vec<Invoice>| remove_record(invoices, id))
    }

    /// Records a payment and applies it to its invoice in one write.
    pub fn create_payment(&self, mut payment: Payment) -> StoreResult<Payment> {
        if payment.date.is_empty() {
            payment.date = self.clock.today();
        }
        self.edit_document(Payment::SECTION, |doc| {
            let mut invoices = self.decode::<Invoice>(doc);
            let invoice = parent_slot(&mut invoices, &payment.invoice_id)?;
            invoice.apply_payment(payment.amount, &payment.date);

            let mut payments = self.decode::<Payment>(doc);
            let created = insert_record(&mut payments, payment)?;

            let text =
                doc.replace_section(&self.registry, Payment::SECTION, &Payment::encode(&payments));
            let text = Document::parse(&text).replace_section(
                &self.registry,
                Invoice::SECTION,
                &Invoice::encode(&invoices),
            );
            Ok((text, created))
        })
    }
}
