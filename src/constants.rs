pub const VIEWER_ID_KEY: &str = "viewer_id";

pub const VERSION_ALLOCATION_RETRIES: usize = 3;

pub const EXAMPLE_SPECS: [(&str, &str); 5] = [
    (
        "Marketplace Orders",
        "Build a B2C marketplace backend where users browse products, place orders, and track \
         shipment status. Include inventory reservation and payment capture via webhook callbacks.",
    ),
    (
        "Team Task Manager",
        "Create a task manager for small teams. Users create projects, tasks, comments, and \
         activity feeds. Need list APIs for projects and tasks with filters and sorting.",
    ),
    (
        "Video Processing Pipeline",
        "A media app uploads videos, transcodes in background workers, and notifies users when \
         processing finishes. Include webhook delivery for partner integrations.",
    ),
    (
        "Subscription Billing",
        "SaaS billing system with plans, subscriptions, invoices, and recurring payments. Payment \
         provider sends webhooks for success/failure events and retries.",
    ),
    (
        "Support Ticketing",
        "Customer support platform with tickets, assignments, SLA timers, and analytics \
         dashboards. Needs searchable ticket list endpoints and reporting data marts.",
    ),
];
