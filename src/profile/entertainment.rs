//! Grupo Musical Versátil La Célula, live music for events

use super::{DecorationDef, PackageDef, Profile, RuleDef};

const SYSTEM_PROMPT: &str = "Eres el asistente virtual de **Grupo Musical Versátil La Célula**, \
un grupo musical con más de 10 años de experiencia en bodas, XV años, eventos corporativos y fiestas privadas.

Tu objetivo es resolver dudas sobre los paquetes y llevar al cliente a una cotización personalizada.

Paquetes:
1. **Paquete Event Plus**: eventos grandes (50-2000 invitados), 5 horas de música en vivo, iluminación, pantalla y animadores.
2. **Paquete Party**: eventos medianos (30-250 invitados), 5 horas de música, iluminación y efectos especiales.
3. **Paquete Live**: eventos masivos o corporativos, show temático personalizado, hasta 10,000 personas.

Contratación: cotización personalizada, reserva con anticipo del 30%, confirmación de detalles y pago del saldo antes del evento.
Recomienda reservar con 2-3 meses de anticipación, sobre todo en temporada alta (diciembre-enero y mayo-junio).

Para cotizaciones y disponibilidad inmediata, invita al cliente a escribir por WhatsApp al **55 3541 2631** \
o a contacto@grupomusicalcelula.com.

Responde en español, con tono cálido y entusiasta, usa **negritas** para lo importante y algunos emojis. Sé breve.";

const RULES: &[RuleDef] = &[
    RuleDef {
        keywords: &["servicios", "paquete*", "ofrecen", "tienen"],
        replies: &["¡Claro! 🎵 En **Grupo Musical La Célula** ofrecemos 3 paquetes principales:\n\n\
1. **Paquete Event Plus**: Ideal para grandes eventos (50-2000 invitados), incluye 5 horas de música en vivo, iluminación, pantalla y animadores.\n\
2. **Paquete Party**: Perfecto para eventos medianos (30-250 invitados), con 5 horas de música, iluminación y efectos especiales.\n\
3. **Paquete Live**: Para eventos masivos o corporativos, con show temático personalizado y capacidad hasta 10,000 personas.\n\n\
¿Cuál te interesa más para tu evento? 😊"],
    },
    RuleDef {
        keywords: &["precio*", "costo*", "cotiz*", "cuanto", "cuánto"],
        replies: &["Para ofrecerte una **cotización personalizada** 💰 necesitamos conocer algunos detalles de tu evento:\n\n\
- ¿Qué tipo de evento estás planeando? (boda, XV años, corporativo, etc.)\n\
- ¿Cuántos invitados aproximadamente tendrás?\n\
- ¿Ya tienes fecha y lugar definidos?\n\n\
Puedes proporcionarnos esta información aquí o contactarnos directamente por WhatsApp al **55 3541 2631** para una atención más rápida."],
    },
    RuleDef {
        keywords: &["musica", "música", "cancion*", "canción", "repertorio", "tocan", "generos", "géneros"],
        replies: &["¡Nuestra **versatilidad musical** es nuestra mayor fortaleza! 🎸🎹🎺\n\n\
Nuestro repertorio incluye:\n\
- Cumbia, Salsa y música tropical\n\
- Rock clásico y contemporáneo\n\
- Pop en español e inglés\n\
- Baladas y música romántica\n\
- Música regional mexicana\n\
- Jazz, Swing y música para ambientar\n\n\
Además, diseñamos bloques musicales personalizados para cada momento de tu evento. ¿Hay algún género que te interese?"],
    },
    RuleDef {
        keywords: &["boda*", "matrimonio", "novia*"],
        replies: &["¡Las **bodas** son nuestra especialidad! 💍✨\n\n\
- **Ceremonia**: Música elegante y emotiva\n\
- **Recepción y coctel**: Ambientación sofisticada\n\
- **Banquete**: Música suave de fondo\n\
- **Fiesta**: ¡Todos a la pista de baile!\n\n\
Nuestro **Paquete Party** es muy popular para bodas, pero podemos personalizarlo según tus necesidades. ¿Ya tienes fecha para tu boda?"],
    },
    RuleDef {
        keywords: &["xv", "quince*", "quinceañera*"],
        replies: &["¡Para **XV Años** creamos momentos inolvidables! 🎂👗\n\n\
- Música especial para el vals y ceremonias tradicionales\n\
- Show 80's o temático a elección\n\
- Dinámicas y animación para todos tus invitados\n\
- Efectos especiales y luces\n\
- ¡Batucada para el momento de máxima diversión!\n\n\
El **Paquete Party** es perfecto para la mayoría de las fiestas de XV años. ¿Qué tipo de música te gustaría?"],
    },
    RuleDef {
        keywords: &["corporativo*", "empresa*", "convención", "convencion"],
        replies: &["Para **eventos corporativos** ofrecemos soluciones profesionales y versátiles. 🏢✨\n\n\
- Música adaptada a la imagen de su empresa\n\
- Shows temáticos personalizados\n\
- Equipo técnico de primer nivel\n\
- Puntualidad y profesionalismo\n\n\
El **Paquete Live** está diseñado especialmente para eventos corporativos grandes. ¿Podría contarme más sobre su evento?"],
    },
    RuleDef {
        keywords: &["disponib*", "fecha*", "día", "agenda", "cuando", "cuándo"],
        replies: &["Para verificar nuestra **disponibilidad** necesitamos saber:\n\n\
- ¿Qué día específico estás considerando?\n\
- ¿En qué horario sería tu evento?\n\
- ¿Qué tipo de evento estás planeando?\n\n\
Te recomendamos reservar con 2-3 meses de anticipación, especialmente en temporada alta (diciembre-enero y mayo-junio). Consulta disponibilidad inmediata por WhatsApp al **55 3541 2631** 📱"],
    },
    RuleDef {
        keywords: &["contrat*", "reserv*", "anticipo", "apartado", "proceso"],
        replies: &["El **proceso de contratación** es muy sencillo: 🎵📝\n\n\
1. **Cotización personalizada** según tus necesidades\n\
2. **Reserva** con un anticipo del 30%\n\
3. **Confirmación** de detalles (horario, playlist especial, etc.)\n\
4. **Pago** del saldo restante antes del evento\n\
5. **¡Disfruta tu evento!** Nosotros nos encargamos de todo\n\n\
Para comenzar, contáctanos por WhatsApp al **55 3541 2631**. ¿Te gustaría iniciar el proceso ahora?"],
    },
    RuleDef {
        keywords: &["equipo*", "instrument*", "sonido", "montaje"],
        replies: &["Contamos con **equipo profesional** para eventos de cualquier tamaño: 🎧🎚️\n\n\
- Sistemas de sonido de alta fidelidad\n\
- Iluminación profesional robotizada y láser\n\
- Pantallas LED (según el paquete)\n\
- Instrumentos profesionales\n\
- Efectos especiales\n\n\
Realizamos el **montaje completo** 2-3 horas antes del evento. ¿Tienes alguna necesidad técnica específica?"],
    },
    RuleDef {
        keywords: &["hola", "buenos dias", "buenos días", "buenas tardes", "buenas noches", "saludos", "buen día"],
        replies: &["¡Hola! 👋 Bienvenido al asistente virtual de **Grupo Musical Versátil La Célula**. \
Estoy aquí para ayudarte a encontrar la música perfecta para tu evento. \
¿Buscas información sobre nuestros paquetes, disponibilidad o tienes alguna duda específica?"],
    },
    RuleDef {
        keywords: &["gracias", "adios", "adiós", "hasta luego", "bye", "chao"],
        replies: &["¡Gracias por contactarnos! 🎵 Ha sido un placer ayudarte. Si tienes más preguntas, \
escríbenos por WhatsApp al **55 3541 2631**. ¡Esperamos ser parte de tu evento especial! 🎉"],
    },
];

pub(super) static PROFILE: Profile = Profile {
    key: "entertainment",
    business_name: "Grupo Musical Versátil La Célula",
    assistant_name: "Asistente La Célula",
    tagline: "Música versátil para eventos inolvidables",
    website: "www.grupomusicalcelula.com",
    address: "Ciudad de México",
    phone_display: "55 3541 2631",
    whatsapp_e164: "525535412631",
    country_code: "52",
    email: "contacto@grupomusicalcelula.com",
    system_prompt: SYSTEM_PROMPT,
    greeting: "¡Hola! 👋 Soy el asistente virtual de **Grupo Musical Versátil La Célula**. \
¿Qué evento estás planeando? Puedo contarte sobre nuestros **paquetes**, repertorio y disponibilidad.",
    rules: RULES,
    fallbacks: &[
        "Gracias por tu mensaje. En **Grupo Musical La Célula** nos especializamos en hacer tu evento inolvidable con nuestra música versátil. 🎵\n\n\
¿Podrías contarme más sobre el tipo de evento que estás planeando?",
        "¡Qué interesante! Para ofrecerte la mejor recomendación, me gustaría saber: ¿estás planeando una boda 💍, XV años 🎂, evento corporativo 🏢 u otro tipo de celebración?",
        "Entiendo. Para ayudarte mejor, ¿podrías indicarme aproximadamente cuántas personas asistirán a tu evento?",
        "Gracias por compartir esa información. 😊 Si quieres una **cotización personalizada**, escríbenos por WhatsApp al **55 3541 2631** o cuéntame más detalles aquí mismo.",
        "**Grupo Musical Versátil La Célula** tiene más de 10 años de experiencia creando ambientes musicales perfectos. ¿Hay algún género musical que te gustaría incluir en tu evento?",
        "Me encantaría ayudarte a hacer tu evento especial. ¿Ya tienes una fecha definida? Podemos verificar nuestra disponibilidad.",
    ],
    apology: "Gracias por tu mensaje. ¿Podrías contarme más sobre tu evento? También puedes escribirnos por WhatsApp al **55 3541 2631**.",
    summary_triggers: &[
        "cotizar",
        "cotización",
        "precio",
        "costo",
        "contratar",
        "paquete",
        "fecha",
    ],
    high_intent_keywords: &[
        "cotizar",
        "contratar",
        "disponibilidad",
        "precio",
        "costo",
        "fecha",
        "reservar",
    ],
    decorative_terms: &[DecorationDef {
        pattern: r"\bPaquete (?:Event Plus|Party|Live)\b",
        glyph: "🎵",
    }],
    packages: &[
        PackageDef {
            name: "Paquete Event Plus",
            reason: "ideal para eventos grandes como bodas, XV años o graduaciones",
            keywords: &[
                "boda",
                "matrimonio",
                "grande",
                "100 invitados",
                "200 invitados",
                "salon",
                "graduación",
                "graduacion",
                "xv años",
                "quinceañera",
                "quinceañeros",
            ],
        },
        PackageDef {
            name: "Paquete Party",
            reason: "perfecto para fiestas medianas y celebraciones privadas",
            keywords: &[
                "fiesta",
                "celebración",
                "pequeña",
                "privada",
                "cumpleaños",
                "aniversario",
                "50 personas",
                "casa",
                "intima",
            ],
        },
        PackageDef {
            name: "Paquete Live",
            reason: "diseñado para eventos corporativos o masivos",
            keywords: &[
                "corporativo",
                "empresa",
                "masivo",
                "promoción",
                "lanzamiento",
                "concierto",
                "presentación",
                "evento grande",
                "500 personas",
                "1000 personas",
            ],
        },
    ],
    default_package: "Paquete Party (recomendación predeterminada - contactar para confirmar necesidades)",
    rules_first: true,
    email_subject: "🎵 Nueva consulta musical - {name}",
    whatsapp_greeting: "te contacto de Grupo Musical La Célula por tu consulta para tu evento",
    follow_up: &[
        "Contactar al cliente lo antes posible (preferiblemente en las próximas 2 horas)",
        "Ofrecer información específica sobre los paquetes adecuados para su evento",
        "Verificar disponibilidad para la fecha solicitada",
        "Enviar propuesta personalizada o coordinar una llamada para detalles",
    ],
};
