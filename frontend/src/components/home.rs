use crate::components::header::Header;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <Header />
            <div class="hero py-16">
                <div class="hero-content text-center">
                    <div class="max-w-md">
                        <h1 class="text-4xl font-bold">"Welcome to Shop Verse"</h1>
                        <p class="py-6 text-base-content/70">
                            "Discover amazing products from various brands."
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}
